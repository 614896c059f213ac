use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DatasetError;

/// Names of the final-area columns, for player one and player two.
pub const AREA_COLUMNS: [&str; 2] = ["Area_P1", "Area_P2"];

/// The name of the column holding the move at (0-based) ply `ply`,
/// e.g. `Move_1_P1`, `Move_2_P2`, `Move_3_P1`.
pub fn move_column_name(ply: usize) -> String {
    format!("Move_{}_P{}", ply + 1, 1 + ply % 2)
}

/// One finished game: its moves as linear cell ids in play order, and the
/// final area percentages of player one and player two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRow {
    pub moves: Vec<usize>,
    pub areas: [f64; 2],
}

/// An immutable table of past games that the move heuristic learns from.
///
/// Every row has the same number of moves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoricalDataset {
    num_moves: usize,
    rows: Vec<GameRow>,
}

impl HistoricalDataset {
    /// Fails if a row does not have exactly `num_moves` moves.
    pub fn new(num_moves: usize, rows: Vec<GameRow>) -> Result<Self, DatasetError> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.moves.len() != num_moves)
        {
            return Err(DatasetError::RowLength {
                row: idx,
                expected: num_moves,
                found: row.moves.len(),
            });
        }
        Ok(Self { num_moves, rows })
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Reads a table with a header line and comma separated values.
    ///
    /// Columns are looked up by name, so their order does not matter and
    /// unknown columns are ignored. The move columns must be contiguous,
    /// starting at `Move_1_P1`.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DatasetError> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(DatasetError::MissingColumn {
                    name: move_column_name(0),
                })
            }
        };
        let header: Vec<&str> = header.trim_end().split(',').map(str::trim).collect();
        let find = |name: &str| -> Result<usize, DatasetError> {
            header
                .iter()
                .position(|&col| col == name)
                .ok_or_else(|| DatasetError::MissingColumn {
                    name: String::from(name),
                })
        };

        let mut move_indices = Vec::new();
        while let Ok(idx) = find(&move_column_name(move_indices.len())) {
            move_indices.push(idx);
        }
        let area_indices = [find(AREA_COLUMNS[0])?, find(AREA_COLUMNS[1])?];

        let mut rows = Vec::new();
        for (line_idx, line) in lines.enumerate() {
            let line = line?;
            let line_no = line_idx + 2;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.trim_end().split(',').map(str::trim).collect();
            if fields.len() != header.len() {
                return Err(DatasetError::MalformedRow {
                    line: line_no,
                    reason: format!(
                        "expected {} fields, found {}",
                        header.len(),
                        fields.len()
                    ),
                });
            }
            let moves = move_indices
                .iter()
                .map(|&idx| parse_move(fields[idx], line_no))
                .collect::<Result<Vec<usize>, DatasetError>>()?;
            let areas = [
                parse_area(fields[area_indices[0]], line_no)?,
                parse_area(fields[area_indices[1]], line_no)?,
            ];
            rows.push(GameRow { moves, areas });
        }

        Ok(Self {
            num_moves: move_indices.len(),
            rows,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), DatasetError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the table in the format read by [`Self::from_reader()`].
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), DatasetError> {
        let mut header: Vec<String> = (0..self.num_moves).map(move_column_name).collect();
        header.extend(AREA_COLUMNS.iter().map(|&name| String::from(name)));
        writeln!(writer, "{}", header.join(","))?;
        for row in &self.rows {
            for mv in &row.moves {
                write!(writer, "{},", mv)?;
            }
            writeln!(writer, "{},{}", row.areas[0], row.areas[1])?;
        }
        Ok(())
    }

    /// The number of move columns.
    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[GameRow] {
        &self.rows
    }

    /// Checks that the columns needed to choose the move at `ply` exist,
    /// i.e. the first `ply` moves as features and move `ply + 1` as label.
    pub fn check_ply(&self, ply: usize) -> Result<(), DatasetError> {
        if ply + 1 > self.num_moves {
            return Err(DatasetError::MalformedDataset {
                needed_moves: ply + 1,
                available_moves: self.num_moves,
            });
        }
        Ok(())
    }
}

fn parse_move(field: &str, line: usize) -> Result<usize, DatasetError> {
    if let Ok(id) = field.parse::<usize>() {
        return Ok(id);
    }
    // Some tools write integer columns as floats, e.g. "57.0"
    match field.parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 => Ok(value as usize),
        _ => Err(DatasetError::MalformedRow {
            line,
            reason: format!("'{}' is not a cell id", field),
        }),
    }
}

fn parse_area(field: &str, line: usize) -> Result<f64, DatasetError> {
    match field.parse::<f64>() {
        Ok(value) if (0.0..=100.0).contains(&value) => Ok(value),
        _ => Err(DatasetError::MalformedRow {
            line,
            reason: format!("'{}' is not an area percentage", field),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
Move_1_P1,Move_2_P2,Move_3_P1,Move_4_P2,Area_P1,Area_P2
12,87,45,3,51.5,40.25
99,0,55.0,21,30,62
";

    #[test]
    fn column_names() {
        assert_eq!(move_column_name(0), "Move_1_P1");
        assert_eq!(move_column_name(1), "Move_2_P2");
        assert_eq!(move_column_name(9), "Move_10_P2");
    }

    #[test]
    fn read_table() {
        let dataset = HistoricalDataset::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(dataset.num_moves(), 4);
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.rows()[0],
            GameRow {
                moves: vec![12, 87, 45, 3],
                areas: [51.5, 40.25]
            }
        );
        assert_eq!(dataset.rows()[1].moves, vec![99, 0, 55, 21]);
    }

    #[test]
    fn columns_are_found_by_name() {
        let table = "Area_P2,Move_2_P2,Area_P1,Move_1_P1\n10,7,20,3\n";
        let dataset = HistoricalDataset::from_reader(table.as_bytes()).unwrap();
        assert_eq!(dataset.num_moves(), 2);
        assert_eq!(dataset.rows()[0].moves, vec![3, 7]);
        assert_eq!(dataset.rows()[0].areas, [20.0, 10.0]);
    }

    #[test]
    fn written_table_reads_back() {
        let dataset = HistoricalDataset::from_reader(TABLE.as_bytes()).unwrap();
        let mut buf = Vec::new();
        dataset.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Move_1_P1,Move_2_P2,Move_3_P1,Move_4_P2,Area_P1,Area_P2\n"));
        assert!(text.contains("12,87,45,3,51.5,40.25\n"));
        assert_eq!(HistoricalDataset::from_reader(text.as_bytes()).unwrap(), dataset);
    }

    #[test]
    fn missing_area_column() {
        let table = "Move_1_P1,Move_2_P2,Area_P1\n1,2,3\n";
        match HistoricalDataset::from_reader(table.as_bytes()) {
            Err(DatasetError::MissingColumn { name }) => assert_eq!(name, "Area_P2"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn malformed_rows() {
        let table = "Move_1_P1,Area_P1,Area_P2\n1,2\n";
        assert!(matches!(
            HistoricalDataset::from_reader(table.as_bytes()),
            Err(DatasetError::MalformedRow { line: 2, .. })
        ));
        let table = "Move_1_P1,Area_P1,Area_P2\n-4,2,3\n";
        assert!(matches!(
            HistoricalDataset::from_reader(table.as_bytes()),
            Err(DatasetError::MalformedRow { line: 2, .. })
        ));
        let table = "Move_1_P1,Area_P1,Area_P2\n4,200,3\n";
        assert!(matches!(
            HistoricalDataset::from_reader(table.as_bytes()),
            Err(DatasetError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn ply_beyond_the_move_columns() {
        let dataset = HistoricalDataset::from_reader(TABLE.as_bytes()).unwrap();
        assert!(dataset.check_ply(3).is_ok());
        assert!(matches!(
            dataset.check_ply(4),
            Err(DatasetError::MalformedDataset {
                needed_moves: 5,
                available_moves: 4
            })
        ));
    }

    #[test]
    fn rows_must_have_the_same_length() {
        let rows = vec![
            GameRow {
                moves: vec![1, 2],
                areas: [1.0, 2.0],
            },
            GameRow {
                moves: vec![1],
                areas: [1.0, 2.0],
            },
        ];
        assert!(matches!(
            HistoricalDataset::new(2, rows),
            Err(DatasetError::RowLength {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }
}
