/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
/// POST request bodies
pub mod payload;
/// Document query options
pub mod query;
/// Raw responses with JSON helpers
pub mod response;

pub use payload::Payload;
pub use query::DocQuery;
pub use response::FrappeResponse;
