//!  Local persistence for the tracker. Everything lives in a small key-value
//!  directory inside the application path:
//!   - `epics` holds the full epic list as one JSON array.
//!   - `session` exists only while work is in progress. Absence of the key is
//!     the on-disk form of "no active session".
//!   - `schema` marks that the keyed layout is in place.

pub mod kv;

pub const EPICS_KEY: &str = "epics";
pub const SESSION_KEY: &str = "session";
pub const SCHEMA_KEY: &str = "schema";
