//! Renders the delta between two service manifests as pretty JSON.
//!
//! Run with `cargo run --example delta_report`.

use anyhow::Result;
use recdiff::{compare, reflect_record, EngineConfig};

reflect_record! {
    #[derive(Debug, Clone)]
    pub struct Probe {
        pub path: String,
        pub period_s: u32,
    }
}

reflect_record! {
    #[derive(Debug, Clone)]
    pub struct Manifest {
        pub name: String,
        pub replicas: i64,
        pub p99_ms: f64,
        pub image: String,
        pub probe: Probe,
        pub canary: Option<Box<Manifest>>,
        pub ports: Vec<u16>,
        revision: u64,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let old = Manifest {
        name: "checkout".into(),
        replicas: 42,
        p99_ms: 53.032,
        image: "registry.local/checkout:1.4.0".into(),
        probe: Probe {
            path: "/healthz".into(),
            period_s: 10,
        },
        canary: None,
        ports: vec![8080, 9090, 9100],
        revision: 17,
    };

    let mut new = old.clone();
    new.p99_ms = 53.042;
    new.image = "registry.local/checkout:1.5.1".into();
    new.canary = Some(Box::new(Manifest {
        replicas: 1,
        canary: None,
        revision: 18,
        ..old.clone()
    }));
    new.ports = vec![8080, 8443, 9100, 9200];
    new.revision = 18;

    let delta = compare(&old, &new, &EngineConfig::default())?;
    println!("{} changed paths at top level", delta.len());
    println!("{}", delta.to_json_pretty()?);

    // The same comparison with the image tag excluded.
    let config = EngineConfig::new().exclude("image");
    let delta = compare(&old, &new, &config)?;
    println!("without image: {}", delta.to_json()?);

    Ok(())
}
