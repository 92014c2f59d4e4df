use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use crate::trading::planner::{ItemDecision, TradePlan};

const HEADER: &str = "timestamp,assetid,market_name,type,price,decision,eligible";

/// Appends every trade decision to a CSV file
pub struct CsvLogger {
    log_path: String,
}

impl CsvLogger {
    /// Opens (or creates) the log and writes the header if the file is empty
    pub fn new(log_path: String) -> Result<Self> {
        let logger = Self { log_path };

        let mut file = logger.open()?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", HEADER)?;
        }

        Ok(logger)
    }

    /// Log every decision of a plan under one timestamp
    pub fn log_plan(&self, plan: &TradePlan) -> Result<()> {
        let mut file = self.open()?;

        let timestamp = Utc::now().to_rfc3339();
        for decision in &plan.decisions {
            self.write_row(&mut file, &timestamp, decision)?;
        }

        Ok(())
    }

    fn open(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open decision log: {}", self.log_path))
    }

    fn write_row(&self, file: &mut impl Write, timestamp: &str, decision: &ItemDecision) -> Result<()> {
        let type_str = decision.item_type.map_or("", |t| t.label());

        let price_str = match decision.decision.price() {
            Some(price) => format!("{:.2}", price),
            None => "".to_string(),
        };

        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            timestamp,
            decision.assetid,
            quote(&decision.market_name),
            type_str,
            price_str,
            decision.decision,
            decision.decision.is_eligible()
        )?;

        Ok(())
    }
}

/// Market names can contain commas and quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::ItemType;
    use crate::trading::eligibility::TradeDecision;

    fn temp_log(name: &str) -> String {
        let path = std::env::temp_dir().join(format!("{}-{}.csv", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_log_plan_writes_header_and_rows() {
        let path = temp_log("decision-log-plan");
        let logger = CsvLogger::new(path.clone()).unwrap();

        let plan = TradePlan {
            decisions: vec![
                ItemDecision {
                    assetid: 1,
                    market_name: "AK-47 | Redline (Field-Tested)".to_string(),
                    item_type: Some(ItemType::Rifle),
                    decision: TradeDecision::BelowMinPrice(12.5),
                },
                ItemDecision {
                    assetid: 2,
                    market_name: "Music Kit | Daniel Sadowski, Crimson Assault".to_string(),
                    item_type: None,
                    decision: TradeDecision::UnknownPrice,
                },
            ],
            ..TradePlan::default()
        };

        logger.log_plan(&plan).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].ends_with(",1,\"AK-47 | Redline (Field-Tested)\",Rifle,12.50,below_min_price($12.50),true"));
        assert!(lines[2].ends_with(",2,\"Music Kit | Daniel Sadowski, Crimson Assault\",,,unknown_price,false"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_existing_log_is_appended() {
        let path = temp_log("decision-log-append");
        let plan = TradePlan {
            decisions: vec![ItemDecision {
                assetid: 7,
                market_name: "Sticker | Crown (Foil)".to_string(),
                item_type: Some(ItemType::Sticker),
                decision: TradeDecision::Override(ItemType::Sticker),
            }],
            ..TradePlan::default()
        };

        CsvLogger::new(path.clone()).unwrap().log_plan(&plan).unwrap();
        CsvLogger::new(path.clone()).unwrap().log_plan(&plan).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert_eq!(contents.lines().filter(|l| *l == HEADER).count(), 1);
        assert!(contents.contains(",override(Sticker),true"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_existing_file_gets_header() {
        let path = temp_log("decision-log-empty");
        std::fs::write(&path, "").unwrap();

        CsvLogger::new(path.clone()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().collect::<Vec<_>>(), vec![HEADER]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_quote_escapes_quotes() {
        assert_eq!(quote("Sticker | \"Hello\""), "\"Sticker | \"\"Hello\"\"\"");
    }
}
