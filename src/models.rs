use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::Entity;

// --- Identity (read-only, provisioned by the external identity layer) ---

/// User
///
/// A caller's identity record from the `users` table. The `admin` flag grants
/// the ADMIN role on top of the USER role every known user holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub admin: bool,
}

// --- Persisted Entities ---

/// Article
///
/// A link to an article of interest, submitted with a short explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Article {
    // Generated by the store; zero until the row is inserted.
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub url: String,
    pub explanation: String,
    pub email: String,
    #[ts(type = "string")]
    pub date_added: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ArticleParams {
    pub title: String,
    pub url: String,
    pub explanation: String,
    pub email: String,
    /// ISO-8601 local date-time, e.g. `2022-07-14T16:32:09`.
    pub date_added: NaiveDateTime,
}

impl Entity for Article {
    type Id = i64;
    type Params = ArticleParams;
    const NAME: &'static str = "Article";
    const PATH: &'static str = "/api/articles";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_params(p: ArticleParams) -> Self {
        Self {
            id: 0,
            title: p.title,
            url: p.url,
            explanation: p.explanation,
            email: p.email,
            date_added: p.date_added,
        }
    }

    fn apply(&mut self, incoming: Self) {
        self.title = incoming.title;
        self.url = incoming.url;
        self.explanation = incoming.explanation;
        self.email = incoming.email;
        self.date_added = incoming.date_added;
    }

    fn needs_generated_id(&self) -> bool {
        self.id == 0
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn generated_id(&self) -> Option<i64> {
        (self.id != 0).then_some(self.id)
    }
}

/// HelpRequest
///
/// A request for help raised by a team during a lab session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HelpRequest {
    #[serde(default)]
    pub id: i64,
    pub requester_email: String,
    pub team_id: String,
    pub table_or_breakout_room: String,
    #[ts(type = "string")]
    pub request_time: NaiveDateTime,
    pub explanation: String,
    pub solved: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HelpRequestParams {
    pub requester_email: String,
    pub team_id: String,
    pub table_or_breakout_room: String,
    pub explanation: String,
    pub solved: bool,
    /// ISO-8601 local date-time, e.g. `2022-01-03T00:00:00`.
    pub request_time: NaiveDateTime,
}

impl Entity for HelpRequest {
    type Id = i64;
    type Params = HelpRequestParams;
    const NAME: &'static str = "HelpRequest";
    const PATH: &'static str = "/api/helprequest";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_params(p: HelpRequestParams) -> Self {
        Self {
            id: 0,
            requester_email: p.requester_email,
            team_id: p.team_id,
            table_or_breakout_room: p.table_or_breakout_room,
            request_time: p.request_time,
            explanation: p.explanation,
            solved: p.solved,
        }
    }

    fn apply(&mut self, incoming: Self) {
        self.requester_email = incoming.requester_email;
        self.team_id = incoming.team_id;
        self.table_or_breakout_room = incoming.table_or_breakout_room;
        self.request_time = incoming.request_time;
        self.explanation = incoming.explanation;
        self.solved = incoming.solved;
    }

    fn needs_generated_id(&self) -> bool {
        self.id == 0
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn generated_id(&self) -> Option<i64> {
        (self.id != 0).then_some(self.id)
    }
}

/// MenuItemReview
///
/// A star rating left by a diner for a dining commons menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuItemReview {
    #[serde(default)]
    pub id: i64,
    // Serialized as "itemID" to stay compatible with existing clients.
    #[serde(rename = "itemID")]
    pub item_id: i64,
    pub reviewer_email: String,
    pub stars: i32,
    #[ts(type = "string")]
    pub date_reviewed: NaiveDateTime,
    pub comments: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MenuItemReviewParams {
    #[serde(rename = "itemID")]
    pub item_id: i64,
    pub reviewer_email: String,
    pub stars: i32,
    pub date_reviewed: NaiveDateTime,
    pub comments: String,
}

impl Entity for MenuItemReview {
    type Id = i64;
    type Params = MenuItemReviewParams;
    const NAME: &'static str = "MenuItemReview";
    const PATH: &'static str = "/api/menuitemreview";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_params(p: MenuItemReviewParams) -> Self {
        Self {
            id: 0,
            item_id: p.item_id,
            reviewer_email: p.reviewer_email,
            stars: p.stars,
            date_reviewed: p.date_reviewed,
            comments: p.comments,
        }
    }

    fn apply(&mut self, incoming: Self) {
        self.item_id = incoming.item_id;
        self.reviewer_email = incoming.reviewer_email;
        self.stars = incoming.stars;
        self.date_reviewed = incoming.date_reviewed;
        self.comments = incoming.comments;
    }

    fn needs_generated_id(&self) -> bool {
        self.id == 0
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn generated_id(&self) -> Option<i64> {
        (self.id != 0).then_some(self.id)
    }
}

/// UcsbDiningCommonsMenuItem
///
/// An item served at a station of one of the dining commons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UcsbDiningCommonsMenuItem {
    #[serde(default)]
    pub id: i64,
    pub dining_commons_code: String,
    pub name: String,
    pub station: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UcsbDiningCommonsMenuItemParams {
    /// The dining hall code, e.g. `ortega`.
    pub dining_commons_code: String,
    pub name: String,
    /// Where the item is served.
    pub station: String,
}

impl Entity for UcsbDiningCommonsMenuItem {
    type Id = i64;
    type Params = UcsbDiningCommonsMenuItemParams;
    const NAME: &'static str = "UCSBDiningCommonsMenuItems";
    const PATH: &'static str = "/api/UCSBDiningCommonsMenuItems";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_params(p: UcsbDiningCommonsMenuItemParams) -> Self {
        Self {
            id: 0,
            dining_commons_code: p.dining_commons_code,
            name: p.name,
            station: p.station,
        }
    }

    fn apply(&mut self, incoming: Self) {
        self.dining_commons_code = incoming.dining_commons_code;
        self.name = incoming.name;
        self.station = incoming.station;
    }

    fn needs_generated_id(&self) -> bool {
        self.id == 0
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn generated_id(&self) -> Option<i64> {
        (self.id != 0).then_some(self.id)
    }
}

/// UcsbOrganization
///
/// A student organization keyed by its short code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UcsbOrganization {
    // Natural key, chosen by the caller. Optional in update bodies, which never change it.
    #[serde(default)]
    pub org_code: String,
    pub org_translation_short: String,
    pub org_translation: String,
    pub inactive: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UcsbOrganizationParams {
    pub org_code: String,
    pub org_translation_short: String,
    pub org_translation: String,
    pub inactive: bool,
}

impl Entity for UcsbOrganization {
    type Id = String;
    type Params = UcsbOrganizationParams;
    const NAME: &'static str = "UCSBOrganization";
    const PATH: &'static str = "/api/ucsborganization";
    const ID_PARAM: &'static str = "orgCode";

    fn id(&self) -> String {
        self.org_code.clone()
    }

    fn from_params(p: UcsbOrganizationParams) -> Self {
        Self {
            org_code: p.org_code,
            org_translation_short: p.org_translation_short,
            org_translation: p.org_translation,
            inactive: p.inactive,
        }
    }

    fn apply(&mut self, incoming: Self) {
        self.org_translation_short = incoming.org_translation_short;
        self.org_translation = incoming.org_translation;
        self.inactive = incoming.inactive;
    }
}

/// UcsbDate
///
/// A named date in the academic calendar, tagged with its quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UcsbDate {
    #[serde(default)]
    pub id: i64,
    /// Quarter in `YYYYQ` form, e.g. `20221` for Winter 2022.
    #[serde(rename = "quarterYYYYQ")]
    pub quarter_yyyyq: String,
    pub name: String,
    #[ts(type = "string")]
    pub local_date_time: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UcsbDateParams {
    #[serde(rename = "quarterYYYYQ")]
    pub quarter_yyyyq: String,
    pub name: String,
    pub local_date_time: NaiveDateTime,
}

impl Entity for UcsbDate {
    type Id = i64;
    type Params = UcsbDateParams;
    const NAME: &'static str = "UCSBDate";
    const PATH: &'static str = "/api/ucsbdates";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_params(p: UcsbDateParams) -> Self {
        Self {
            id: 0,
            quarter_yyyyq: p.quarter_yyyyq,
            name: p.name,
            local_date_time: p.local_date_time,
        }
    }

    fn apply(&mut self, incoming: Self) {
        self.quarter_yyyyq = incoming.quarter_yyyyq;
        self.name = incoming.name;
        self.local_date_time = incoming.local_date_time;
    }

    fn needs_generated_id(&self) -> bool {
        self.id == 0
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn generated_id(&self) -> Option<i64> {
        (self.id != 0).then_some(self.id)
    }
}

/// UcsbDiningCommons
///
/// A dining hall keyed by its code, with its services and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UcsbDiningCommons {
    #[serde(default)]
    pub code: String,
    pub name: String,
    pub has_sack_meal: bool,
    pub has_take_out_meal: bool,
    pub has_dining_cam: bool,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UcsbDiningCommonsParams {
    pub code: String,
    pub name: String,
    pub has_sack_meal: bool,
    pub has_take_out_meal: bool,
    pub has_dining_cam: bool,
    pub latitude: f64,
    pub longitude: f64,
}

impl Entity for UcsbDiningCommons {
    type Id = String;
    type Params = UcsbDiningCommonsParams;
    const NAME: &'static str = "UCSBDiningCommons";
    const PATH: &'static str = "/api/ucsbdiningcommons";
    const ID_PARAM: &'static str = "code";

    fn id(&self) -> String {
        self.code.clone()
    }

    fn from_params(p: UcsbDiningCommonsParams) -> Self {
        Self {
            code: p.code,
            name: p.name,
            has_sack_meal: p.has_sack_meal,
            has_take_out_meal: p.has_take_out_meal,
            has_dining_cam: p.has_dining_cam,
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }

    fn apply(&mut self, incoming: Self) {
        self.name = incoming.name;
        self.has_sack_meal = incoming.has_sack_meal;
        self.has_take_out_meal = incoming.has_take_out_meal;
        self.has_dining_cam = incoming.has_dining_cam;
        self.latitude = incoming.latitude;
        self.longitude = incoming.longitude;
    }
}

// --- Response Schemas ---

/// GenericMessage
///
/// Body returned by the delete endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct GenericMessage {
    pub message: String,
}

impl GenericMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
