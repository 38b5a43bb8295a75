#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]

use env_logger::Env;
use log::{info, warn};
use plotters::prelude::*;
use probe_chain::{
    ChainingMap, OpenAddressingMap, StdKeyHasher, find_mode, hash_function_1, hash_function_2,
};
use rand::Rng;

// Load profile settings
const PROFILE_INSERTS: usize = 5_000;
const PROFILE_INITIAL_CAPACITY: usize = 53;
const SAMPLE_EVERY: usize = 25;
const KEY_SPACE: u64 = 1_000_000;
const PROFILE_IMAGE: &str = "load_profile.png";

const ENGINES: [&str; 2] = ["Open addressing", "Separate chaining"];

#[derive(Debug, thiserror::Error)]
enum ProfileError {
    #[error("failed to draw {chart}: {message}")]
    Chart { chart: &'static str, message: String },

    #[error("{engine} failed the {workload} check: {detail}")]
    Integrity { engine: &'static str, workload: &'static str, detail: String },
}

fn chart_error<E: std::fmt::Display>(chart: &'static str) -> impl Fn(E) -> ProfileError {
    move |error| ProfileError::Chart { chart, message: error.to_string() }
}

/// Table statistics after `inserted` puts
#[derive(Debug, Clone, Copy)]
struct Sample {
    inserted: usize,
    load: f64,
    capacity: usize,
    empty: usize,
}

// Both engines grow from the same start; the classic 150-key run.
fn put_workload() {
    let mut open = OpenAddressingMap::with_capacity_and_hasher(53, hash_function_1);
    let mut chained = ChainingMap::with_capacity_and_hasher(53, hash_function_1);

    for i in 0..150 {
        open.put(format!("str{i}"), i * 100);
        chained.put(format!("str{i}"), i * 100);
        if i % 25 == 24 {
            info!(
                "put {:>3}: open addressing empty={} load={:.2} size={} capacity={}",
                i + 1,
                open.empty_buckets(),
                open.table_load(),
                open.len(),
                open.capacity()
            );
            info!(
                "put {:>3}: chaining        empty={} load={:.2} size={} capacity={}",
                i + 1,
                chained.empty_buckets(),
                chained.table_load(),
                chained.len(),
                chained.capacity()
            );
        }
    }
}

// Repeated resizes must keep every inserted key and no others.
fn resize_workload() -> Result<(), ProfileError> {
    let keys: Vec<usize> = (25..1000).step_by(13).collect();
    let mut open = OpenAddressingMap::with_capacity_and_hasher(75, hash_function_2);
    let mut chained = ChainingMap::with_capacity_and_hasher(75, hash_function_2);
    for &key in &keys {
        open.put(key.to_string(), key * 42);
        chained.put(key.to_string(), key * 42);
    }

    for capacity in (111..1000).step_by(117) {
        open.resize_table(capacity);
        chained.resize_table(capacity);

        if open.table_load() > <OpenAddressingMap<usize>>::MAX_LOAD_FACTOR {
            return Err(ProfileError::Integrity {
                engine: ENGINES[0],
                workload: "resize",
                detail: format!("load {:.2} after resize to {capacity}", open.table_load()),
            });
        }

        let missing_open = keys.iter().filter(|key| !open.contains_key(&key.to_string())).count();
        let missing_chained =
            keys.iter().filter(|key| !chained.contains_key(&key.to_string())).count();
        let phantom = keys
            .iter()
            .filter(|key| {
                let absent = (*key + 1).to_string();
                open.contains_key(&absent) || chained.contains_key(&absent)
            })
            .count();

        for (engine, missing) in ENGINES.into_iter().zip([missing_open, missing_chained]) {
            if missing > 0 {
                return Err(ProfileError::Integrity {
                    engine,
                    workload: "resize",
                    detail: format!("{missing} keys lost at capacity {capacity}"),
                });
            }
        }
        if phantom > 0 {
            warn!("{phantom} keys that were never inserted reported as present");
        }

        info!(
            "resize {capacity:>3}: open addressing capacity={} load={:.2}, chaining capacity={} load={:.2}",
            open.capacity(),
            open.table_load(),
            chained.capacity(),
            chained.table_load()
        );
    }
    Ok(())
}

fn mode_workload() {
    let cases: [&[&str]; 4] = [
        &["apple", "apple", "grape", "melon", "peach"],
        &["Arch", "Manjaro", "Manjaro", "Mint", "Mint", "Mint", "Ubuntu", "Ubuntu", "Ubuntu"],
        &["one", "two", "three", "four", "five"],
        &["2", "4", "2", "6", "8", "4", "1", "3", "4", "5", "7", "3", "3", "2"],
    ];

    for case in cases {
        let (modes, frequency) = find_mode(case);
        info!("mode of {case:?}: {modes:?} (frequency {frequency})");
    }
}

fn profile<M>(
    map: &mut M,
    keys: &[String],
    put: impl Fn(&mut M, &str),
    stats: impl Fn(&M) -> (f64, usize, usize),
) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(keys.len() / SAMPLE_EVERY + 1);
    for (inserted, key) in keys.iter().enumerate() {
        put(map, key.as_str());
        if inserted % SAMPLE_EVERY == 0 {
            let (load, capacity, empty) = stats(map);
            samples.push(Sample { inserted: inserted + 1, load, capacity, empty });
        }
    }
    samples
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    title: &'static str,
    y_desc: &str,
    series: &[Vec<(usize, f64)>],
) -> Result<(), ProfileError> {
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];
    let max_x = series.iter().flatten().map(|&(x, _)| x).max().unwrap_or(1);
    let max_y = series.iter().flatten().map(|&(_, y)| y).fold(0.0, f64::max) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0..max_x, 0.0..max_y.max(1.0))
        .map_err(chart_error(title))?;

    chart
        .configure_mesh()
        .x_desc("Keys inserted")
        .y_desc(y_desc)
        .draw()
        .map_err(chart_error(title))?;

    for ((points, engine), color) in series.iter().zip(ENGINES).zip(colors) {
        let line_style = ShapeStyle::from(&color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))
            .map_err(chart_error(title))?
            .label(engine)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(chart_error(title))?;

    Ok(())
}

fn load_profile() -> Result<(), ProfileError> {
    let mut rng = rand::rng();
    let keys: Vec<String> =
        (0..PROFILE_INSERTS).map(|_| format!("key-{}", rng.random_range(0..KEY_SPACE))).collect();

    let mut open: OpenAddressingMap<(), StdKeyHasher> =
        OpenAddressingMap::with_capacity_and_hasher(PROFILE_INITIAL_CAPACITY, StdKeyHasher);
    let open_samples = profile(
        &mut open,
        &keys,
        |map, key| {
            map.put(key, ());
        },
        |map| (map.table_load(), map.capacity(), map.empty_buckets()),
    );

    let mut chained: ChainingMap<(), StdKeyHasher> =
        ChainingMap::with_capacity_and_hasher(PROFILE_INITIAL_CAPACITY, StdKeyHasher);
    let chained_samples = profile(
        &mut chained,
        &keys,
        |map, key| {
            map.put(key, ());
        },
        |map| (map.table_load(), map.capacity(), map.empty_buckets()),
    );

    for (engine, samples) in ENGINES.into_iter().zip([&open_samples, &chained_samples]) {
        if let Some(last) = samples.last() {
            info!(
                "{engine}: {} keys, load {:.2}, capacity {}, {} empty buckets",
                last.inserted, last.load, last.capacity, last.empty
            );
        }
    }

    let extract = |pick: fn(&Sample) -> f64| -> Vec<Vec<(usize, f64)>> {
        [&open_samples, &chained_samples]
            .into_iter()
            .map(|samples| samples.iter().map(|s| (s.inserted, pick(s))).collect())
            .collect()
    };

    let root = BitMapBackend::new(PROFILE_IMAGE, (1200, 1500)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error("background"))?;
    let areas = root.split_evenly((3, 1));
    let panels: [(&'static str, &str, fn(&Sample) -> f64); 3] = [
        ("Load factor", "live entries / buckets", |s| s.load),
        ("Capacity", "buckets", |s| s.capacity as f64),
        ("Empty buckets", "buckets", |s| s.empty as f64),
    ];
    for (area, (title, y_desc, pick)) in areas.iter().zip(panels) {
        draw_panel(area, title, y_desc, &extract(pick))?;
    }
    root.present().map_err(chart_error("load profile"))?;

    info!("wrote {PROFILE_IMAGE}");
    Ok(())
}

fn main() -> Result<(), ProfileError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    put_workload();
    resize_workload()?;
    mode_workload();
    load_profile()
}
