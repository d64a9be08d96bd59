use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::cleaning::format_date_time;
use crate::error::Result;
use crate::game::{GameRow, GameTable, ScrapedGame};

pub const TRANSFORMED_COLUMNS: [&str; 33] = [
    "season",
    "team",
    "week",
    "day",
    "date",
    "time",
    "result",
    "ot",
    "record",
    "home_team",
    "opp",
    "points_scored",
    "points_allowed",
    "1st_downs",
    "totyd",
    "passyd",
    "rushyd",
    "to",
    "1st_downs_allowed",
    "totyd_allowed",
    "passyd_allowed",
    "rushyd_allowed",
    "to_forced",
    "off_exp_pts",
    "def_exp_pts",
    "sts_exp_pts",
    "home_or_away",
    "month",
    "day_of_month",
    "year",
    "hour",
    "date_time",
    "win",
];

pub fn load_scraped_csv(path: &Path) -> Result<Vec<ScrapedGame>> {
    let file = fs::File::open(path)?;
    read_scraped(file)
}

pub fn read_scraped<R: Read>(rdr: R) -> Result<Vec<ScrapedGame>> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut out = Vec::new();
    for record in reader.deserialize::<ScrapedGame>() {
        out.push(record?);
    }
    Ok(out)
}

pub fn write_scraped_csv(path: &Path, games: &[ScrapedGame]) -> Result<()> {
    write_atomically(path, |w| write_scraped(w, games))
}

pub fn write_scraped<W: Write>(w: W, games: &[ScrapedGame]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    for game in games {
        writer.serialize(game)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_transformed_csv(path: &Path, table: &GameTable) -> Result<()> {
    write_atomically(path, |w| write_transformed(w, table))
}

pub fn write_transformed<W: Write>(w: W, table: &GameTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    let header = TRANSFORMED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(table.rate_columns.iter().cloned());
    writer.write_record(header)?;
    for row in &table.rows {
        writer.write_record(transformed_record(row))?;
    }
    writer.flush()?;
    Ok(())
}

fn transformed_record(row: &GameRow) -> Vec<String> {
    let g = &row.game;
    let mut out = vec![
        g.season.to_string(),
        g.team.clone(),
        g.week.clone(),
        g.day.clone(),
        g.date.clone(),
        g.time.clone(),
        g.result.clone(),
        g.ot.clone(),
        g.record.clone(),
        g.venue.clone(),
        g.opp.clone(),
    ];
    out.extend(
        [
            g.points_scored,
            g.points_allowed,
            g.first_downs,
            g.totyd,
            g.passyd,
            g.rushyd,
            g.to,
            g.first_downs_allowed,
            g.totyd_allowed,
            g.passyd_allowed,
            g.rushyd_allowed,
            g.to_forced,
            g.off_exp_pts,
            g.def_exp_pts,
            g.sts_exp_pts,
        ]
        .iter()
        .map(|v| opt_cell(*v)),
    );
    out.push(
        row.home_or_away
            .map(|side| side.as_str().to_string())
            .unwrap_or_default(),
    );
    out.push(opt_cell(row.month));
    out.push(opt_cell(row.day_of_month));
    out.push(opt_cell(row.year));
    out.push(opt_cell(row.hour));
    out.push(row.date_time.as_ref().map(format_date_time).unwrap_or_default());
    out.push(opt_cell(row.win));
    out.extend(row.rates.iter().map(|v| opt_cell(*v)));
    out
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_atomically(
    path: &Path,
    write: impl FnOnce(&mut fs::File) -> Result<()>,
) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = tmp_path(path);
    let mut file = fs::File::create(&tmp)?;
    if let Err(err) = write(&mut file) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
