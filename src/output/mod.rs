pub mod csv;
pub mod export;
pub mod json;
pub mod report;
pub mod table;
