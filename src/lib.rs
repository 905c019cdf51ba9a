// Library root
// ------------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules into the igcheck flow.
//
// Module responsibilities:
// - `cli`: clap surface and credential resolution (flag > env > prompt).
// - `session`: load/save of the opaque Instagram session blob.
// - `api`: blocking client for the private web endpoints (login, 2FA,
//   friendship pages, unfollow).
// - `diff`: the following-minus-followers computation.
// - `output`: console table, JSON and CSV rendering.
// - `ui`: interactive multi-select unfollow step.
// - `error`: the error taxonomy shared by `api` and `ui`.
pub mod api;
pub mod cli;
pub mod diff;
pub mod error;
pub mod output;
pub mod session;
pub mod ui;
