use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::store;
use crate::model::config::ArborConfig;
use crate::model::node::demo_seed;

const CONFIG_TEMPLATE: &str = r##"# arbor configuration

[store]
# Flat node list, relative to this file. `.toml` files use [[nodes]] tables,
# anything else is read as a JSON array.
file = "nodes.json"

[reparent]
# Exit non-zero when a drop is rejected (self-drop, cycle, unknown id, ...)
strict = false

[display]
style = "unicode"        # "unicode" or "ascii"
label = "Item {id}"
show_disabled = true
max_indent = 64          # deeper levels are drawn with an elision mark
"##;

/// Write arbor.toml and the demo node list into `dir`.
///
/// Both targets are checked before either is written, so a refused init
/// leaves the directory as it was.
pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config: ArborConfig = toml::from_str(CONFIG_TEMPLATE)?;
    let config_path = dir.join(CONFIG_FILE);
    let nodes_path = config_io::store_path(dir, &config);

    if !args.force {
        for path in [&config_path, &nodes_path] {
            if path.exists() {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )
                .into());
            }
        }
    }

    fs::create_dir_all(dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    store::save_nodes(&nodes_path, &demo_seed())?;

    println!("Initialized arbor in {}", dir.display());
    Ok(())
}
