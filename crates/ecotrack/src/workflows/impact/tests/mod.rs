mod common;

mod routes;
