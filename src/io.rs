use crate::engine::{AvailabilityReport, ConflictReport};
use crate::model::{
    parse_date, DateRange, Fleet, LeaveRequest, LeaveRequestId, LeaveStatus, Pilot, PilotId, Rank,
};
use crate::period::RosterPeriod;
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de pilotes depuis CSV: header `id,name,rank,seniority_number[,active]`
pub fn import_pilots_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Pilot>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if id.is_empty() || name.is_empty() {
            bail!("invalid pilot row (empty)");
        }
        let rank: Rank = rec
            .get(2)
            .context("missing rank")?
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid rank for pilot {id}"))?;
        let seniority: i32 = rec
            .get(3)
            .context("missing seniority_number")?
            .trim()
            .parse()
            .with_context(|| format!("invalid seniority_number for pilot {id}"))?;
        let mut pilot = Pilot::new(name, rank, seniority).with_id(PilotId::new(id));
        if let Some(flag) = rec.get(4) {
            let flag = flag.trim();
            if !flag.is_empty() {
                pilot.active = parse_bool(flag)
                    .with_context(|| format!("invalid active value for pilot {id}"))?;
            }
        }
        out.push(pilot);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Import de demandes: header `id,pilot_id,start_date,end_date,status[,created_at]`
///
/// Sans `created_at`, la demande est datée de `fallback_created_at`.
pub fn import_leave_csv<P: AsRef<Path>>(
    path: P,
    fallback_created_at: DateTime<Utc>,
) -> anyhow::Result<Vec<LeaveRequest>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let pilot_id = rec.get(1).context("missing pilot_id")?.trim();
        if id.is_empty() || pilot_id.is_empty() {
            bail!("invalid leave row (empty)");
        }
        let range = DateRange::parse(
            rec.get(2).context("missing start_date")?,
            rec.get(3).context("missing end_date")?,
        )
        .with_context(|| format!("invalid dates for leave request {id}"))?;
        let status: LeaveStatus = rec
            .get(4)
            .context("missing status")?
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid status for leave request {id}"))?;
        let created_at = match rec.get(5).map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_instant(raw)
                .with_context(|| format!("invalid created_at for leave request {id}"))?,
            None => fallback_created_at,
        };

        let mut request = LeaveRequest::new(PilotId::new(pilot_id), range, created_at)
            .with_id(LeaveRequestId::new(id));
        request.status = status;
        out.push(request);
    }
    Ok(out)
}

fn parse_instant(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }
    let date: NaiveDate = parse_date(raw)?;
    let midnight = date.and_hms_opt(0, 0, 0).context("invalid midnight conversion")?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Export JSON de l'instantané (jolie mise en forme)
pub fn export_fleet_json<P: AsRef<Path>>(path: P, fleet: &Fleet) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(fleet)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des conflits, une ligne par demande concurrente.
///
/// Header: `request_id,pilot,seniority_number,start_date,end_date,status,has_priority`
pub fn export_conflicts_csv<P: AsRef<Path>>(
    path: P,
    report: &ConflictReport,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "request_id",
        "pilot",
        "seniority_number",
        "start_date",
        "end_date",
        "status",
        "has_priority",
    ])?;
    for c in &report.conflicts {
        w.write_record([
            c.request_id.as_str().to_string(),
            c.pilot_name.clone(),
            c.seniority_number.to_string(),
            c.start_date.to_string(),
            c.end_date.to_string(),
            c.status.to_string(),
            c.has_priority.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV de l'effectif: une ligne par rang.
pub fn export_availability_csv<P: AsRef<Path>>(
    path: P,
    report: &AvailabilityReport,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "rank",
        "total",
        "on_leave",
        "available",
        "minimum",
        "meets_minimum",
    ])?;
    for rank in Rank::ALL {
        let r = report.for_rank(rank);
        w.write_record([
            rank.to_string(),
            r.total.to_string(),
            r.on_leave.to_string(),
            r.available.to_string(),
            r.minimum.to_string(),
            r.meets_minimum.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des périodes: header `code,number,year,start_date,end_date`
pub fn export_periods_csv<P: AsRef<Path>>(path: P, periods: &[RosterPeriod]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["code", "number", "year", "start_date", "end_date"])?;
    for p in periods {
        w.write_record([
            p.code.clone(),
            p.number.to_string(),
            p.year.to_string(),
            p.start_date.to_string(),
            p.end_date.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
