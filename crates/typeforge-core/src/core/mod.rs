pub mod forcefield;
pub mod io;
pub mod models;
