use serde::{Serialize, de::DeserializeOwned};
use std::{fmt::{Debug, Display}, str::FromStr};

/// Entity
///
/// The contract every persisted record type fulfils so that the generic handlers,
/// routes and repositories can serve it. An entity knows its own name (used in
/// error messages), its route prefix, the query parameter carrying its identifier,
/// and how to be built from the create-request parameters.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Primary key type. Numeric keys are generated by the store; string keys are natural.
    type Id: Clone + Debug + Display + FromStr + PartialEq + Send + Sync + 'static;

    /// Query parameters accepted by `POST {PATH}/post`.
    type Params: DeserializeOwned + Send + 'static;

    /// Name used in messages, e.g. "Article with id 7 not found".
    const NAME: &'static str;

    /// Route prefix, e.g. `/api/articles`.
    const PATH: &'static str;

    /// Name of the query parameter that selects a record by primary key.
    const ID_PARAM: &'static str = "id";

    fn id(&self) -> Self::Id;

    /// Builds an unsaved record from the create-request parameters.
    fn from_params(params: Self::Params) -> Self;

    /// Copies every non-identifier field of `incoming` onto `self`.
    fn apply(&mut self, incoming: Self);

    /// True while the record is waiting for the store to assign its identifier.
    fn needs_generated_id(&self) -> bool {
        false
    }

    /// Receives a store-generated identifier. No-op for natural keys.
    fn assign_id(&mut self, _id: i64) {}

    /// The store-generated identifier, if this entity uses one and has it.
    fn generated_id(&self) -> Option<i64> {
        None
    }
}
