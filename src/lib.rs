// Library root
// ------------
// The binary (`main.rs`) wires these together; everything that talks to
// the network goes through `transport::Transport` so it can be mocked.
//
// - `image`: captioned picture from the cat image service.
// - `disk`: folder check/creation, remote-fetch upload, folder listing.
// - `poll`: waits for an asynchronous upload to land.
// - `manifest`: local JSON summary of the folder.
// - `pipeline`: runs the steps above in order.
// - `config`, `logging`, `credentials`, `ui`: startup plumbing.
pub mod config;
pub mod credentials;
pub mod disk;
pub mod image;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod poll;
pub mod transport;
pub mod ui;
