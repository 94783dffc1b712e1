use aztro_compat::{
    compose_profiles, AstrologyResult, Candidate, CelestialBody, Chart, ClassicalDignity,
    EngineConfig, Ranker,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn sample_chart(longitudes: [f64; 10]) -> Chart {
    let bodies = CelestialBody::planets().chain(std::iter::once(CelestialBody::Ascendant));
    bodies
        .zip(longitudes)
        .fold(Chart::new(), |chart, (body, longitude)| chart.with(body, longitude))
}

fn load_config() -> AstrologyResult<EngineConfig> {
    match std::env::var("AZTRO_CONFIG") {
        Ok(path) => {
            info!(%path, "loading engine config");
            EngineConfig::from_path(path)
        }
        Err(_) => Ok(EngineConfig::default()),
    }
}

fn run() -> AstrologyResult<()> {
    let config = load_config()?;
    let ranker = Ranker::new(ClassicalDignity, config);

    // Sun, Moon, Mars, Mercury, Jupiter, Venus, Saturn, Rahu, Ketu, Ascendant
    let seeker = sample_chart([
        63.2, 201.7, 110.4, 80.9, 275.3, 35.1, 310.6, 145.0, 325.0, 15.8,
    ]);
    let candidates = vec![
        Candidate::new(
            "c-001",
            "Arjun",
            sample_chart([
                124.5, 40.2, 280.1, 140.7, 95.3, 160.4, 200.9, 20.0, 200.0, 130.2,
            ]),
        ),
        Candidate::new(
            "c-002",
            "Meera",
            sample_chart([
                300.1, 98.6, 15.2, 290.4, 240.8, 330.0, 70.5, 250.0, 70.0, 185.9,
            ]),
        ),
        Candidate::new(
            "c-003",
            "Kabir",
            sample_chart([
                10.9, 250.3, 190.6, 355.2, 5.4, 45.8, 160.1, 100.0, 280.0, 275.4,
            ]),
        ),
    ];

    let profiles = compose_profiles(ranker.engine(), &seeker);
    println!("{}", serde_json::to_string_pretty(&profiles)?);

    for (perspective, use_traditional) in [
        ("girl_seeking_boy", true),
        ("employer_seeking_employee", false),
        ("business_partner", false),
    ] {
        let ranked = ranker.rank(&candidates, perspective, Some(&seeker), use_traditional);
        info!(perspective, candidates = ranked.len(), "ranking complete");
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    }

    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
