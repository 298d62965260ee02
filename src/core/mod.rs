/// Dashboard aggregation over transactions and channels
pub mod aggregate;
/// Account service and the session backend seam
pub mod auth;
/// Budget CRUD and progress calculation
pub mod budget;
/// Category CRUD and default seeding
pub mod category;
/// Channel CRUD and default seeding
pub mod channel;
/// Profile names
pub mod profile;
/// Date rule for recurring transactions
pub mod recurrence;
/// Dashboard report assembly
pub mod report;
/// Client-side session lifecycle
pub mod session;
/// Transaction CRUD, filters and input validation
pub mod transaction;
/// Boundary validation rules
pub mod validation;
