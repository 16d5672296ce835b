//! JSON:API documents served by the tournament provider
//!
//! Only the attributes the site reads are typed. Anything else the provider
//! sends is kept in `extra` on the attribute structs that commonly grow.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Top-level document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T> {
    pub data: T,
    #[serde(default)]
    pub included: Vec<Included>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl<T> Document<T> {
    /// Find an included resource by type and id
    #[must_use]
    pub fn find_included(&self, kind: &str, id: &str) -> Option<&Included> {
        self.included
            .iter()
            .find(|resource| resource.kind() == kind && resource.id() == Some(id))
    }
}

/// `{type, id}` pointer to another resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// Linkage of a relationship: one, many, or none (`null`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// A named relationship of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<RelationshipData>,
}

impl Relationship {
    /// All linked identifiers, whatever the cardinality
    #[must_use]
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match &self.data {
            Some(RelationshipData::One(one)) => vec![one],
            Some(RelationshipData::Many(many)) => many.iter().collect(),
            None => Vec::new(),
        }
    }
}

/// A resource object with typed attributes `A` and typed meta `M`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<A, M = Value> {
    /// Resource type. Empty inside [`Included`], where the variant carries it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub id: String,
    #[serde(default)]
    pub attributes: A,
    #[serde(default)]
    pub meta: M,
    #[serde(default)]
    pub relationships: BTreeMap<String, Relationship>,
}

impl<A, M> Resource<A, M> {
    /// A named relationship, if present
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }
}

/// A tournament
pub type Tournament = Resource<TournamentAttributes>;
/// A match
pub type Match = Resource<MatchAttributes, MatchMeta>;
/// A team
pub type Team = Resource<TeamAttributes, TeamMeta>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentAttributes {
    pub name: Option<String>,
    pub gender: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    League,
    PlayOff,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupAttributes {
    pub name: Option<String>,
    pub order: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<GroupType>,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchAttributes {
    pub datetime: Option<String>,
    pub finished: Option<bool>,
    pub canceled: Option<bool>,
    pub rest: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMeta {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodAttributes {
    pub finished: Option<bool>,
    pub name: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceoffWinner {
    First,
    Second,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceoffAttributes {
    pub winner: Option<FaceoffWinner>,
    pub first_text: Option<String>,
    pub second_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundAttributes {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamAttributes {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub large: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMeta {
    pub avatar: Option<Avatar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityAttributes {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultAttributes {
    pub value: Option<f64>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    Confirmed,
    Pending,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRefereeAttributes {
    pub attendance: Option<Attendance>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    Executive,
    Player,
    Referee,
    Staff,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseAttributes {
    #[serde(rename = "type")]
    pub kind: Option<LicenseType>,
    pub number: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileAttributes {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
}

/// A resource from the `included` array, tagged by its `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Included {
    Tournament(Resource<TournamentAttributes>),
    Group(Resource<GroupAttributes>),
    Round(Resource<RoundAttributes>),
    Faceoff(Resource<FaceoffAttributes>),
    Match(Resource<MatchAttributes, MatchMeta>),
    Period(Resource<PeriodAttributes>),
    Team(Resource<TeamAttributes, TeamMeta>),
    Facility(Resource<FacilityAttributes>),
    #[serde(rename = "result")]
    MatchResult(Resource<ResultAttributes>),
    #[serde(rename = "matchreferee")]
    MatchReferee(Resource<MatchRefereeAttributes>),
    License(Resource<LicenseAttributes>),
    Profile(Resource<ProfileAttributes>),
    /// Any resource type not listed above
    #[serde(other)]
    Other,
}

impl Included {
    /// The JSON:API type name
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tournament(_) => "tournament",
            Self::Group(_) => "group",
            Self::Round(_) => "round",
            Self::Faceoff(_) => "faceoff",
            Self::Match(_) => "match",
            Self::Period(_) => "period",
            Self::Team(_) => "team",
            Self::Facility(_) => "facility",
            Self::MatchResult(_) => "result",
            Self::MatchReferee(_) => "matchreferee",
            Self::License(_) => "license",
            Self::Profile(_) => "profile",
            Self::Other => "other",
        }
    }

    /// The resource id; unknown for [`Included::Other`]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        let id = match self {
            Self::Tournament(r) => &r.id,
            Self::Group(r) => &r.id,
            Self::Round(r) => &r.id,
            Self::Faceoff(r) => &r.id,
            Self::Match(r) => &r.id,
            Self::Period(r) => &r.id,
            Self::Team(r) => &r.id,
            Self::Facility(r) => &r.id,
            Self::MatchResult(r) => &r.id,
            Self::MatchReferee(r) => &r.id,
            Self::License(r) => &r.id,
            Self::Profile(r) => &r.id,
            Self::Other => return None,
        };
        Some(id.as_str())
    }
}
