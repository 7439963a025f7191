//! CSV export of a trajectory.

use std::io::Write;

use sf_core::Trajectory;

use crate::ResultsResult;

/// Write `trajectory` as CSV: a `t,<labels…>` header, then one row per sample.
///
/// Missing labels become `y<i>`; extra labels are ignored.
pub fn export_csv<W: Write>(
    trajectory: &Trajectory,
    labels: &[String],
    mut writer: W,
) -> ResultsResult<()> {
    let mut header = vec!["t".to_string()];
    header.extend((0..trajectory.dimensions()).map(|i| {
        labels
            .get(i)
            .map(|l| escape(l))
            .unwrap_or_else(|| format!("y{i}"))
    }));
    writeln!(writer, "{}", header.join(","))?;

    for (j, t) in trajectory.times.iter().enumerate() {
        write!(writer, "{t}")?;
        for v in trajectory.states.column(j).iter() {
            write!(writer, ",{v}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
