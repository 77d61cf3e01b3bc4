pub mod bulk;
pub mod controller;
pub mod error;
pub mod page;
pub mod promise;
pub mod reconcile;
pub mod record;
pub mod selection;
pub mod table;
pub mod webapi;
