//! The `conceptquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("conceptquiz.toml").exists() {
        println!("conceptquiz.toml already exists, skipping.");
    } else {
        std::fs::write("conceptquiz.toml", SAMPLE_CONFIG)?;
        println!("Created conceptquiz.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: conceptquiz search cat");
    println!("  2. Run: conceptquiz search chat --rel IsA");
    println!("  3. Play: conceptquiz recall | true-false | guess-who");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# conceptquiz configuration

base_url = "http://api.conceptnet.io"
timeout_secs = 30

# Relations shown per search page
results_per_page = 50

# Every search is run once per language and the results merged
languages = ["en", "fr"]

cache_path = "./conceptquiz-data/http-cache.json"
store_path = "./conceptquiz-data/relations.json"
"#;
