use crate::error::RosterError;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour Pilot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PilotId(String);

impl PilotId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rang d'équipage. Conflits et minimums sont évalués par rang.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Captain,
    FirstOfficer,
}

impl Rank {
    pub const ALL: [Rank; 2] = [Rank::Captain, Rank::FirstOfficer];
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rank::Captain => "Captain",
            Rank::FirstOfficer => "FirstOfficer",
        })
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "captain" | "cpt" | "capt" => Ok(Rank::Captain),
            "firstofficer" | "fo" => Ok(Rank::FirstOfficer),
            _ => Err(format!("unknown rank: {s}")),
        }
    }
}

/// Pilote. Un `seniority_number` plus petit = plus ancien.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pilot {
    pub id: PilotId,
    pub name: String,
    pub rank: Rank,
    pub seniority_number: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Pilot {
    pub fn new<N: Into<String>>(name: N, rank: Rank, seniority_number: i32) -> Self {
        Self {
            id: PilotId::random(),
            name: name.into(),
            rank,
            seniority_number,
            active: true,
        }
    }

    pub fn with_id(mut self, id: PilotId) -> Self {
        self.id = id;
        self
    }
}

/// Intervalle de dates fermé `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RosterError> {
        if end < start {
            return Err(RosterError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Parse deux bornes `YYYY-MM-DD` (ou RFC3339).
    pub fn parse(start: &str, end: &str) -> Result<Self, RosterError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        if !self.overlaps(other) {
            return None;
        }
        Some(DateRange {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Nombre de jours, bornes incluses.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Parse une date `YYYY-MM-DD`, ou un horodatage RFC3339 dont on garde la date locale
/// (le décalage horaire ne déplace pas le jour).
///
/// Une entrée vide ou illisible est une erreur, jamais "aujourd'hui".
pub fn parse_date(raw: &str) -> Result<NaiveDate, RosterError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RosterError::invalid_date(raw, "empty input"));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|err| RosterError::invalid_date(raw, err.to_string()))
}

/// `date + days`, en erreur si on sort du calendrier représentable.
pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, RosterError> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| {
            RosterError::invalid_date(
                date.to_string(),
                format!("offset of {days} days out of range"),
            )
        })
}

/// Identifiant fort pour LeaveRequest
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeaveRequestId(String);

impl LeaveRequestId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Denied,
}

impl LeaveStatus {
    /// Pending et Approved bloquent un créneau ; Denied jamais.
    pub fn is_live(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Denied => "Denied",
        })
    }
}

impl FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "denied" => Ok(LeaveStatus::Denied),
            _ => Err(format!("unknown leave status: {s}")),
        }
    }
}

/// Demande de congé. Le moteur la lit, ne la modifie jamais.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub pilot_id: PilotId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Nouvelle demande, toujours `Pending`.
    pub fn new(pilot_id: PilotId, range: DateRange, created_at: DateTime<Utc>) -> Self {
        Self {
            id: LeaveRequestId::random(),
            pilot_id,
            start_date: range.start,
            end_date: range.end,
            status: LeaveStatus::Pending,
            created_at,
        }
    }

    pub fn with_id(mut self, id: LeaveRequestId) -> Self {
        self.id = id;
        self
    }

    pub fn range(&self) -> Result<DateRange, RosterError> {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Pending -> Approved | Denied, une seule fois.
    pub fn decide(&mut self, status: LeaveStatus) -> Result<(), RosterError> {
        if self.status != LeaveStatus::Pending || status == LeaveStatus::Pending {
            return Err(RosterError::InvalidTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        Ok(())
    }

    /// Modifie les dates ; seulement tant que la demande est `Pending`.
    pub fn reschedule(&mut self, range: DateRange) -> Result<(), RosterError> {
        if self.status != LeaveStatus::Pending {
            return Err(RosterError::InvalidTransition {
                from: self.status.to_string(),
                to: "reschedule".to_string(),
            });
        }
        self.start_date = range.start;
        self.end_date = range.end;
        Ok(())
    }
}

/// Instantané pilotes + congés sur lequel le moteur calcule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fleet {
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub pilots: Vec<Pilot>,
    #[serde(default)]
    pub leave_requests: Vec<LeaveRequest>,
}

impl Fleet {
    pub fn find_pilot<'a>(&'a self, id: &PilotId) -> Option<&'a Pilot> {
        self.pilots.iter().find(|p| &p.id == id)
    }
    pub fn require_pilot<'a>(&'a self, id: &PilotId) -> Result<&'a Pilot, RosterError> {
        self.find_pilot(id)
            .ok_or_else(|| RosterError::UnknownPilot(id.as_str().to_string()))
    }
    pub fn find_request<'a>(&'a self, id: &LeaveRequestId) -> Option<&'a LeaveRequest> {
        self.leave_requests.iter().find(|r| &r.id == id)
    }
    pub fn require_request<'a>(
        &'a self,
        id: &LeaveRequestId,
    ) -> Result<&'a LeaveRequest, RosterError> {
        self.find_request(id)
            .ok_or_else(|| RosterError::UnknownRequest(id.as_str().to_string()))
    }
    pub fn find_request_mut(&mut self, id: &LeaveRequestId) -> Option<&mut LeaveRequest> {
        self.leave_requests.iter_mut().find(|r| &r.id == id)
    }
}

