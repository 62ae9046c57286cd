//! Initialize a new handbook

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Handbook Configuration

# Site
title: React Handbook
description: React, JavaScript and Node.js notes, cheat sheets and interview prep
author: ''

# URL
url: http://localhost:4000
root: /

# Directory
docs_dir: docs
public_dir: public

# Document viewer
viewer:
  # URL prefix the docs directory is served under
  mount: /docs
  # Fetch documents from another server instead of docs_dir
  # base_url: https://example.com
  # timeout_secs: 30

# Code blocks
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false

# Catalog search
search:
  trim_query: true
  # any: one field must contain the query; all: every field must
  match_mode: any
"#;

const GETTING_STARTED: &str = r#"---
title: Getting Started
tags: [react]
---

# Getting Started

Welcome to the handbook! Every markdown file under `docs/` shows up on the
home page and is rendered by the document viewer.

## Run the server

```bash
$ handbook-rs server --open
```

## Add a document

```bash
$ handbook-rs new "Context API"
```

> Documents support tables, task lists, footnotes and fenced code blocks.

| Command  | What it does               |
|----------|----------------------------|
| server   | Serve docs and catalogs    |
| search   | Search a catalog           |
| generate | Export every doc to HTML   |

- [x] Install handbook-rs
- [ ] Write your first note
"#;

const HOOKS_DOC: &str = r#"---
title: Hooks in Practice
tags: [react, hooks]
---

# Hooks in Practice

Hooks let function components hold state and run effects.

## useState

```jsx
const [count, setCount] = useState(0);
```

## useEffect

```jsx
useEffect(() => {
  document.title = `Clicked ${count} times`;
}, [count]);
```

Read the [official docs](https://react.dev/reference/react) for the full list.
"#;

/// Initialize a new handbook in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("docs/react"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Already initialized: {:?}", config_path);
    }
    fs::write(&config_path, CONFIG)?;

    fs::write(target_dir.join("docs/getting-started.md"), GETTING_STARTED)?;
    fs::write(target_dir.join("docs/react/hooks.md"), HOOKS_DOC)?;

    Ok(())
}
