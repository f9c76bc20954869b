use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use lotostat_core::models::{validate_draw, Board, Draw, DrawRepository};

/// Colonnes : index;date;n1;…;nk, avec une ligne d'en-tête.
fn parse_record(record: &csv::StringRecord, board: &Board) -> Result<Draw> {
    let get = |idx: usize| {
        record
            .get(idx)
            .map(str::trim)
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let index_str = get(0)?;
    let index: u32 = index_str
        .parse()
        .with_context(|| format!("Index de tirage invalide : '{}'", index_str))?;
    let date = get(1)?.to_string();

    let numbers = (0..board.pick_count())
        .map(|i| {
            let s = get(2 + i)?;
            s.parse::<u8>()
                .with_context(|| format!("Impossible de parser '{}' (index {})", s, 2 + i))
        })
        .collect::<Result<Vec<u8>>>()?;

    validate_draw(&numbers, board)?;
    Ok(Draw::new(index, date, numbers))
}

#[derive(Debug)]
pub struct ImportResult {
    pub total_records: u32,
    pub imported: u32,
    pub errors: u32,
}

pub fn read_draws<R: Read>(reader: R, board: &Board) -> Result<(DrawRepository, ImportResult)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(reader);

    let mut result = ImportResult { total_records: 0, imported: 0, errors: 0 };
    let mut draws = Vec::new();

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record, board) {
                Ok(draw) => {
                    draws.push(draw);
                    result.imported += 1;
                }
                Err(e) => {
                    log::warn!("Ligne {} ignorée : {:#}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::warn!("Erreur lecture ligne {} : {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    let repo = DrawRepository::new(*board, draws)?;
    Ok((repo, result))
}

pub fn import_csv(path: &Path, board: &Board) -> Result<(DrawRepository, ImportResult)> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    read_draws(file, board)
}
