// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataset loader.
//!
//! Read the first rows of a comma-separated file and index columns 1 to 4 of
//! each row as `(x, y, w, h)`. The row number is the payload.
//!
//! Run:
//! - `cargo run -p canopy_demos --example rstar_dataset -- data.csv [rows]`

use std::io;

use canopy_rstar::{Accept, BoundingBox, Count, RStarTree, RTreeParams};
use log::{info, warn};

fn parse(field: Option<&str>, row: usize) -> io::Result<f64> {
    let text = field.ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, format!("row {row} has fewer than 5 columns"))
    })?;
    text.trim().parse().map_err(|err| {
        io::Error::new(io::ErrorKind::InvalidData, format!("row {row}: {text:?}: {err}"))
    })
}

fn main() -> io::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: rstar_dataset <file.csv> [rows]");
        return Ok(());
    };
    let rows: usize = match args.next() {
        Some(n) => n
            .parse()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, format!("{n:?}: {err}")))?,
        None => 100,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)?;

    let params = RTreeParams::new(2, 4).expect("2/4 is a valid fan-out");
    let mut tree: RStarTree<f64, usize, 2> = RStarTree::with_params(params);
    for (row, record) in reader.records().take(rows).enumerate() {
        let record = record?;
        let [x, y, w, h] = [1, 2, 3, 4].map(|col| parse(record.get(col), row));
        let (w, h) = (w?, h?);
        if w < 0.0 || h < 0.0 {
            warn!("row {row} has a negative extent");
        }
        tree.insert(BoundingBox::from_origin_extent([x?, y?], [w, h]), row);
    }
    info!("loaded {} rows from {path}", tree.len());

    let any = tree.query(&Accept::Any, Count::default());
    println!("AcceptAny: {} entries visited ({} entries in tree)", any.count, tree.len());
    if let Some(first) = tree.iter().next() {
        let area = *first.bound();
        let hits = tree.query(&Accept::Overlapping(area), Count::default());
        println!("{} entries overlap {area}", hits.count);
    }
    println!("height {}", tree.height());
    Ok(())
}
