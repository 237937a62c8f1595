use crate::error::TeamboardError;

pub type TeamboardResult<T> = Result<T, TeamboardError>;
