use crate::analysis::DeltaSummary;
use crate::data::model::DataTable;

use super::spec::{Marker, Panel, PlotSpec, Series};

/// Upper bound on series per overview chart; purely a readability limit for
/// the renderer, no semantic meaning over the data.
pub const DEFAULT_BATCH_SIZE: usize = 40;

// ---------------------------------------------------------------------------
// Batch – one contiguous slice of the parameter list
// ---------------------------------------------------------------------------

/// A bounded group of parameters destined for one overview chart. Borrows the
/// table's parameter list; the row data itself is shared by all batches.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    pub parameter_names: &'a [String],
    /// Offset of this slice within the full parameter list.
    pub start: usize,
}

// ---------------------------------------------------------------------------
// ChartBatcher – plot-spec emission over a loaded table
// ---------------------------------------------------------------------------

/// Read-only emitter of plot specs: batched overview charts covering every
/// parameter, and the two-panel delta comparison chart.
pub struct ChartBatcher<'a> {
    table: &'a DataTable,
}

impl<'a> ChartBatcher<'a> {
    pub fn new(table: &'a DataTable) -> Self {
        ChartBatcher { table }
    }

    /// Lazily partition the parameter list into contiguous slices of at most
    /// `batch_size` names; the final batch may be smaller.
    pub fn batches(&self, batch_size: usize) -> impl Iterator<Item = Batch<'a>> {
        let batch_size = batch_size.max(1); // step_by panics on zero
        let names = self.table.parameter_names();
        (0..names.len()).step_by(batch_size).map(move |start| {
            let end = (start + batch_size).min(names.len());
            Batch {
                parameter_names: &names[start..end],
                start,
            }
        })
    }

    /// Number of batches `batches(batch_size)` will yield.
    pub fn batch_count(&self, batch_size: usize) -> usize {
        self.table
            .parameter_names()
            .len()
            .div_ceil(batch_size.max(1))
    }

    /// Multi-series overview chart for one batch: every parameter in the
    /// batch plotted against X. Parameters absent from a row appear as `NaN`
    /// so the renderer draws a gap instead of aborting the chart.
    pub fn overview_spec(&self, batch: &Batch<'_>, index: usize, total: usize) -> PlotSpec {
        let mut columns = Vec::with_capacity(batch.parameter_names.len() + 1);
        columns.push("X".to_string());
        columns.extend(batch.parameter_names.iter().cloned());

        let rows = self
            .table
            .points()
            .iter()
            .map(|point| {
                let mut row = Vec::with_capacity(columns.len());
                row.push(point.x);
                row.extend(
                    batch
                        .parameter_names
                        .iter()
                        .map(|name| point.values.get(name).copied().unwrap_or(f64::NAN)),
                );
                row
            })
            .collect();

        let series = batch
            .parameter_names
            .iter()
            .enumerate()
            .map(|(i, name)| Series {
                column: i + 1,
                label: name.clone(),
            })
            .collect();

        PlotSpec {
            name: format!("batch_{index}"),
            width: 1600,
            height: 1000,
            comment: None,
            columns,
            rows,
            panels: vec![Panel {
                title: format!("Parameters Batch {} of {}", index + 1, total),
                x_label: "X".to_string(),
                y_label: "Value".to_string(),
                y_range: None,
                series,
                markers: vec![],
                key_outside: true,
            }],
        }
    }

    /// Two-panel delta comparison chart: the raw parameter curves with the
    /// selected points on top, the delta series with its own marker below.
    ///
    /// Callers obtain `deltas` from a successful
    /// [`crate::analysis::DeltaAnalyzer::delta_series`], which guarantees both
    /// parameters are present in every row; the `NaN` fallback here can only
    /// fire if that contract is bypassed.
    pub fn delta_spec(
        &self,
        summary: &DeltaSummary,
        deltas: &[f64],
        y_range: (f64, f64),
    ) -> PlotSpec {
        let columns = vec![
            "X".to_string(),
            summary.param1.clone(),
            summary.param2.clone(),
            "Delta".to_string(),
        ];

        let rows = self
            .table
            .points()
            .iter()
            .zip(deltas)
            .map(|(point, &delta)| {
                let value = |name: &str| point.values.get(name).copied().unwrap_or(f64::NAN);
                vec![point.x, value(&summary.param1), value(&summary.param2), delta]
            })
            .collect();

        PlotSpec {
            name: format!("delta_comparison_{}", summary.x),
            width: 1200,
            height: 800,
            comment: Some(format!(
                "X {} {} Delta",
                summary.param1, summary.param2
            )),
            columns,
            rows,
            panels: vec![
                Panel {
                    title: "Parameter Values".to_string(),
                    x_label: "X".to_string(),
                    y_label: "Value".to_string(),
                    y_range: None,
                    series: vec![
                        Series {
                            column: 1,
                            label: summary.param1.clone(),
                        },
                        Series {
                            column: 2,
                            label: summary.param2.clone(),
                        },
                    ],
                    markers: vec![
                        Marker {
                            x: summary.x,
                            y: summary.value1,
                            label: Some("Selected Points".to_string()),
                        },
                        Marker {
                            x: summary.x,
                            y: summary.value2,
                            label: None,
                        },
                    ],
                    key_outside: false,
                },
                Panel {
                    title: format!("Delta ({} - {})", summary.param2, summary.param1),
                    x_label: "X".to_string(),
                    y_label: "Delta".to_string(),
                    y_range: Some(y_range),
                    series: vec![Series {
                        column: 3,
                        label: "Delta".to_string(),
                    }],
                    markers: vec![Marker {
                        x: summary.x,
                        y: summary.delta,
                        label: Some(format!(
                            "Delta at X={}: {:.3}",
                            summary.x, summary.delta
                        )),
                    }],
                    key_outside: false,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{padded_range, DeltaAnalyzer};
    use crate::data::loader::load_reader;
    use crate::data::model::DataTable;

    fn wide_table(param_count: usize) -> DataTable {
        let mut header = String::from("t");
        for i in 0..param_count {
            header.push_str(&format!(",p{i}"));
        }
        let mut csv = format!("{header}\n");
        for x in 0..3 {
            csv.push_str(&x.to_string());
            for i in 0..param_count {
                csv.push_str(&format!(",{}", x * 10 + i));
            }
            csv.push('\n');
        }
        load_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn eighty_five_parameters_make_three_batches() {
        let table = wide_table(85);
        let batcher = ChartBatcher::new(&table);
        let sizes: Vec<usize> = batcher
            .batches(DEFAULT_BATCH_SIZE)
            .map(|b| b.parameter_names.len())
            .collect();
        assert_eq!(sizes, vec![40, 40, 5]);
        assert_eq!(batcher.batch_count(DEFAULT_BATCH_SIZE), 3);
    }

    #[test]
    fn batches_are_contiguous_slices_of_the_parameter_list() {
        let table = wide_table(85);
        let batcher = ChartBatcher::new(&table);
        let all = table.parameter_names();
        for batch in batcher.batches(40) {
            let end = batch.start + batch.parameter_names.len();
            assert_eq!(batch.parameter_names, &all[batch.start..end]);
        }
        let starts: Vec<usize> = batcher.batches(40).map(|b| b.start).collect();
        assert_eq!(starts, vec![0, 40, 80]);
    }

    #[test]
    fn batching_twice_yields_identical_batches() {
        let table = wide_table(10);
        let batcher = ChartBatcher::new(&table);
        let first: Vec<Vec<String>> = batcher
            .batches(3)
            .map(|b| b.parameter_names.to_vec())
            .collect();
        let second: Vec<Vec<String>> = batcher
            .batches(3)
            .map(|b| b.parameter_names.to_vec())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn overview_spec_shape() {
        let table = wide_table(3);
        let batcher = ChartBatcher::new(&table);
        let batch = batcher.batches(40).next().unwrap();
        let spec = batcher.overview_spec(&batch, 0, 1);

        assert_eq!(spec.name, "batch_0");
        assert_eq!((spec.width, spec.height), (1600, 1000));
        assert_eq!(spec.columns, ["X", "p0", "p1", "p2"]);
        assert_eq!(spec.rows.len(), table.len());
        assert_eq!(spec.rows[1], vec![1.0, 10.0, 11.0, 12.0]);

        let panel = &spec.panels[0];
        assert_eq!(panel.title, "Parameters Batch 1 of 1");
        assert!(panel.key_outside);
        assert_eq!(panel.series.len(), 3);
        assert_eq!(panel.series[2].column, 3);
    }

    #[test]
    fn overview_spec_renders_gaps_as_nan() {
        let table = load_reader("t,a,b\n0,1,x\n1,2,3\n".as_bytes()).unwrap();
        let batcher = ChartBatcher::new(&table);
        let batch = batcher.batches(40).next().unwrap();
        let spec = batcher.overview_spec(&batch, 0, 1);
        assert!(spec.rows[0][2].is_nan());
        assert_eq!(spec.rows[1][2], 3.0);
    }

    #[test]
    fn delta_spec_has_two_panels_and_clamped_range() {
        let table = load_reader("t,p1,p2\n0,1,4\n1,2,2\n".as_bytes()).unwrap();
        let analyzer = DeltaAnalyzer::new(&table, "p1", "p2");
        let deltas = analyzer.delta_series().unwrap();
        let summary = analyzer.summarize(0.5).unwrap();
        let y_range = padded_range(&deltas);

        let spec = ChartBatcher::new(&table).delta_spec(&summary, &deltas, y_range);
        assert_eq!(spec.name, "delta_comparison_0.5");
        assert_eq!(spec.comment.as_deref(), Some("X p1 p2 Delta"));
        assert_eq!(spec.rows, vec![vec![0.0, 1.0, 4.0, 3.0], vec![1.0, 2.0, 2.0, 0.0]]);

        assert_eq!(spec.panels.len(), 2);
        let top = &spec.panels[0];
        assert_eq!(top.series.len(), 2);
        assert_eq!(top.markers.len(), 2);
        assert_eq!(top.markers[1].label, None);

        let bottom = &spec.panels[1];
        assert_eq!(bottom.title, "Delta (p2 - p1)");
        assert_eq!(bottom.y_range, Some(y_range));
        assert_eq!(bottom.markers[0].label.as_deref(), Some("Delta at X=0.5: 0.000"));
    }
}
