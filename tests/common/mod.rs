/*!
 * Common test utilities for the docwai test suite
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use docwai::app_config::Config;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A sample MDX document exercising every protected region kind
pub fn sample_document() -> String {
    r#"---
id: getting-started
title: Getting Started
description: How to install the tool
---
Welcome to the guide.

```bash
cargo install docwai
```

| Option | Description |
| ------ | ----------- |
| `-o`   | Output dir  |

Some prose between tables and tabs.

<Tabs groupId="os">
<TabItem value="linux" label="Linux">

Linux instructions here.

</TabItem>
</Tabs>

:::note
Remember to set your API key.
:::

![diagram](/apps/main-app/static/images/diagram.png)

Closing prose.
"#
    .to_string()
}

/// A minimal valid document: front matter plus one line of prose
pub fn minimal_document() -> String {
    "---\nid: page\n---\nJust some prose.\n".to_string()
}

/// Default configuration for tests
pub fn test_config() -> Config {
    Config::default()
}
