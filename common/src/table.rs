//! レコードテーブル（CSV読み込み）
//!
//! カラムの存在は読み込み時には検証しない。
//! 必須カラムが欠けている場合は `record()` で最初にアクセスした時点で
//! `Error::Load` になる。
//!
//! `confidence_score` の表示形式は読み込み時にカラム全体から決める。
//! 全行が整数なら `1`、数値（空欄を含む）なら `1.0` / `1e-05`、
//! 数値でない値が混ざればセルの文字列をそのまま表示する。

use crate::error::{Error, Result};
use crate::types::{
    Record, COLUMN_CONFIDENCE_SCORE, COLUMN_COORDINATES, COLUMN_FILENAME, COLUMN_S3_PATH,
};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSVから読み込んだ行の並び（読み込み後は不変）
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    score_column: ScoreColumn,
}

/// `confidence_score` カラムの型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ScoreColumn {
    Integer,
    #[default]
    Float,
    /// 数値でないセルを含む
    Text,
}

impl ScoreColumn {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = ScoreColumn::Integer;
        for cell in cells {
            if cell.parse::<i64>().is_ok() {
                continue;
            }
            if cell.is_empty() || cell.parse::<f64>().is_ok() {
                kind = ScoreColumn::Float;
                continue;
            }
            return ScoreColumn::Text;
        }
        kind
    }

    /// (数値, 表示文字列)
    fn read(self, raw: &str) -> (f64, String) {
        let value = raw.parse::<f64>().unwrap_or(f64::NAN);
        let text = match self {
            ScoreColumn::Integer => raw
                .parse::<i64>()
                .map(|n| n.to_string())
                .unwrap_or_else(|_| raw.to_string()),
            ScoreColumn::Float => format_float(value),
            ScoreColumn::Text if raw.is_empty() => "nan".to_string(),
            ScoreColumn::Text => raw.to_string(),
        };
        (value, text)
    }
}

impl RecordTable {
    /// CSVファイルを読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::Load(format!("{}: {}", path.display(), e)))?;
        let table = Self::from_reader(file)?;
        tracing::debug!(path = %path.display(), rows = table.len(), "loaded CSV");
        Ok(table)
    }

    /// 任意のリーダーからCSVを読み込む（アップロードされたバイト列など）
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(Error::Load("CSV has no header row".into()));
        }

        let rows = rdr
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let score_column = match headers
            .iter()
            .position(|h| strip_bom(h) == COLUMN_CONFIDENCE_SCORE)
        {
            Some(position) => {
                ScoreColumn::infer(rows.iter().map(|row| row.get(position).unwrap_or("")))
            }
            None => ScoreColumn::default(),
        };

        Ok(Self {
            headers,
            rows,
            score_column,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> Vec<&str> {
        self.headers.iter().map(strip_bom).collect()
    }

    /// 指定行を型付きレコードとして取り出す
    pub fn record(&self, index: usize) -> Result<Record> {
        let row = self.rows.get(index).ok_or(Error::RowOutOfRange {
            index,
            len: self.rows.len(),
        })?;

        let (confidence_score, confidence_text) = self
            .score_column
            .read(self.column(row, COLUMN_CONFIDENCE_SCORE)?);
        Ok(Record {
            filename: self.column(row, COLUMN_FILENAME)?.to_string(),
            confidence_score,
            confidence_text,
            s3_path: self.column(row, COLUMN_S3_PATH)?.to_string(),
            coordinates: self.column(row, COLUMN_COORDINATES)?.to_string(),
        })
    }

    fn column<'a>(&self, row: &'a StringRecord, name: &str) -> Result<&'a str> {
        let position = self
            .headers
            .iter()
            .position(|h| strip_bom(h) == name)
            .ok_or_else(|| Error::Load(format!("missing column `{}`", name)))?;
        // flexibleなので短い行は空文字扱い
        Ok(row.get(position).unwrap_or(""))
    }
}

fn strip_bom(header: &str) -> &str {
    header.trim_start_matches('\u{feff}')
}

/// 浮動小数点数の表示（`1.0`, `0.5`, `1e-05`, `1e+16`, `nan`）
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent = exponent.parse::<i32>().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let fixed = value.to_string();
        if fixed.contains('.') {
            fixed
        } else {
            format!("{}.0", fixed)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
filename,confidence_score,s3_path,coordinates
a.jpg,0.91,images/a.jpg,\"[1,2,3,4]\"
b.jpg,0.5,images/b.jpg,\"[[1,2,3,4],[5,6,7,8]]\"
";

    #[test]
    fn test_from_reader_reads_rows() {
        let table = RecordTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.headers(),
            vec!["filename", "confidence_score", "s3_path", "coordinates"]
        );

        let record = table.record(1).unwrap();
        assert_eq!(record.filename, "b.jpg");
        assert_eq!(record.confidence_score, 0.5);
        assert_eq!(record.s3_path, "images/b.jpg");
        assert_eq!(record.coordinates, "[[1,2,3,4],[5,6,7,8]]");
    }

    #[test]
    fn test_missing_column_fails_on_access_not_load() {
        let csv = "filename,confidence_score,coordinates\na.jpg,0.9,[1]\n";
        let table = RecordTable::from_reader(csv.as_bytes()).expect("load succeeds");
        let err = table.record(0).unwrap_err();
        assert!(matches!(err, Error::Load(ref msg) if msg.contains("s3_path")));
    }

    #[test]
    fn test_extra_columns_ignored_and_order_free() {
        let csv = "s3_path,extra,coordinates,filename,confidence_score\nk,x,[],f.png,1\n";
        let table = RecordTable::from_reader(csv.as_bytes()).unwrap();
        let record = table.record(0).unwrap();
        assert_eq!(record.filename, "f.png");
        assert_eq!(record.s3_path, "k");
        assert_eq!(record.confidence_score, 1.0);
    }

    #[test]
    fn test_record_out_of_range() {
        let table = RecordTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(matches!(
            table.record(2),
            Err(Error::RowOutOfRange { index: 2, len: 2 })
        ));
    }

    fn scores(csv_scores: &[&str]) -> Vec<(f64, String)> {
        let mut csv = String::from("filename,confidence_score,s3_path,coordinates\n");
        for score in csv_scores {
            csv.push_str(&format!("f,{},k,[]\n", score));
        }
        let table = RecordTable::from_reader(csv.as_bytes()).unwrap();
        (0..table.len())
            .map(|i| {
                let record = table.record(i).unwrap();
                (record.confidence_score, record.confidence_text)
            })
            .collect()
    }

    fn texts(csv_scores: &[&str]) -> Vec<String> {
        scores(csv_scores).into_iter().map(|(_, text)| text).collect()
    }

    #[test]
    fn test_integer_score_column() {
        assert_eq!(texts(&["1", "0", "+7"]), vec!["1", "0", "7"]);
    }

    #[test]
    fn test_float_score_column() {
        assert_eq!(
            texts(&["1", "0.5", "0.00001", "1e16", "123.25"]),
            vec!["1.0", "0.5", "1e-05", "1e+16", "123.25"]
        );
    }

    #[test]
    fn test_empty_score_makes_column_float() {
        let parsed = scores(&["1", ""]);
        assert_eq!(parsed[0], (1.0, "1.0".to_string()));
        assert!(parsed[1].0.is_nan());
        assert_eq!(parsed[1].1, "nan");
    }

    #[test]
    fn test_text_score_column_keeps_raw_cells() {
        let parsed = scores(&["high", "0.50", ""]);
        assert!(parsed[0].0.is_nan());
        assert_eq!(parsed[0].1, "high");
        assert_eq!(parsed[1], (0.5, "0.50".to_string()));
        assert_eq!(parsed[2].1, "nan");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(1.5e-7), "1.5e-07");
        assert_eq!(format_float(1e15), "1000000000000000.0");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn test_empty_input_is_load_error() {
        assert!(matches!(
            RecordTable::from_reader("".as_bytes()),
            Err(Error::Load(_))
        ));
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let table =
            RecordTable::from_reader("filename,confidence_score,s3_path,coordinates\n".as_bytes())
                .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_bom_in_first_header() {
        let csv = "\u{feff}filename,confidence_score,s3_path,coordinates\na,1,k,[]\n";
        let table = RecordTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.record(0).unwrap().filename, "a");
    }

    #[test]
    fn test_load_missing_file() {
        let result = RecordTable::load(Path::new("/nonexistent/records.csv"));
        assert!(matches!(result, Err(Error::Load(_))));
    }
}
