// ACU backend HTTP API
//
// The backend exposes plain JSON request/response endpoints under `/api`.
// Each endpoint returns either a link status or a frame exchange
// (`{frame, response, parsed?}`); failures arrive as non-2xx responses
// carrying a `detail` string.

pub mod antenna;
pub mod client;
pub mod frames;
pub mod link;

pub use client::AcuClient;
