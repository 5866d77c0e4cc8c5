// Result table, paradox labels and views
//
// A `ResultTable` is produced once per analysis run and never edited. Paradox
// labels are derived columns kept beside it in `LabeledResults`, keyed by the
// policy and the pair of trend columns compared.

mod labels;
mod table;

pub use labels::{label_rows, LabelKey, LabeledResults, DEFAULT_TREND_COLUMNS};
pub use table::{ResultTable, TrendColumn, TrendRecord, View, RESULT_COLUMNS};
