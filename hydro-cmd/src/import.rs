//! Import CSV exports into a SQLite database file.

use crate::DataArgs;
use log::info;

/// Load `--stations-csv` and `--monthly-csv` into the `--db` file.
///
/// Rows are upserted, so re-importing an export refreshes it in place.
pub fn run_import(data: &DataArgs) -> anyhow::Result<()> {
    let Some(path) = &data.db else {
        anyhow::bail!("import needs --db (or HYDRO_DB) to name the target database file");
    };
    if data.stations_csv.is_none() && data.monthly_csv.is_none() {
        anyhow::bail!("import needs --stations-csv and/or --monthly-csv");
    }
    let db = data.open_database()?;
    let stations = db.query_stations()?.len();
    info!("Import complete. {} now holds {} stations", path.display(), stations);
    Ok(())
}
