//! Configuration section definitions.
//!
//! | Module   | TOML Section                    | Purpose                         |
//! |----------|---------------------------------|---------------------------------|
//! | `bundle` | `[bundle]`, `[bundle.minify]`   | Sources, publishing, minifier   |
//! | `serve`  | `[serve]`                       | Artifact server                 |

mod bundle;
mod serve;

pub use bundle::BundleConfig;
pub use serve::ServeConfig;
