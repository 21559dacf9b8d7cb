//! Scaffold a new blog post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::ContentKind;
use crate::Folio;

/// Default front-matter; new posts start unpublished
const DEFAULT_SCAFFOLD: &str = "---
title: {{ title }}
description: \"\"
date: {{ date }}
published: false
tags: []
---
";

/// Create a post file under the posts directory and return its path
pub fn create_post(folio: &Folio, title: &str) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    let target_dir = folio
        .content_dir
        .join(folio.config.posts.dir(ContentKind::Post));
    fs::create_dir_all(&target_dir)?;

    let filename = folio
        .config
        .new_post_name
        .replace(":title", &slug)
        .replace(":year", &now.format("%Y").to_string())
        .replace(":month", &now.format("%m").to_string())
        .replace(":day", &now.format("%d").to_string());
    let file_path = target_dir.join(filename);

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = folio.base_dir.join("scaffolds").join("post.md");
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    // A JSON string is a valid double-quoted YAML scalar
    let content = scaffold
        .replace("{{ title }}", &serde_json::to_string(title)?)
        .replace("{{ date }}", &now.format("%Y-%m-%d %H:%M:%S").to_string());

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    Ok(file_path)
}

/// Run the new command
pub fn run(folio: &Folio, title: &str) -> Result<()> {
    let path = create_post(folio, title)?;
    println!("Created: {:?}", path);
    Ok(())
}
