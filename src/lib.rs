//! Web front end for describing MILP problems, sending them to the solver
//! service and showing the result on a dashboard.

pub mod config;
pub mod controller;
pub mod domain;
pub mod models;
pub mod routes;
pub mod session;
pub mod upload;
pub mod views;
