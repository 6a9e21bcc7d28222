pub mod classify;
pub mod diagram;
pub mod dispatch;
pub mod entities;
pub mod locate;
pub mod observations;
pub mod read;
pub mod relations;
pub mod shared;
