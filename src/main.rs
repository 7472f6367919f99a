use chrono::{Duration, TimeZone, Utc};
use heliostat::algorithms::to_unit_vector;
use heliostat::{
    ApproximateEphemeris, ConfigurationManager, TickReport, TrackingConfig, TrackingResult,
    TrackingScheduler,
};
use log::info;

fn print_report(report: &TickReport, json: bool) {
    if json {
        match serde_json::to_string(report) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to serialize tick {}: {}", report.tick, e),
        }
        return;
    }

    let sun = &report.sun;
    println!("Time: {}", sun.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Sun Elevation: {:.2}°, Sun Azimuth: {:.2}°", sun.elevation, sun.azimuth);
    if let Ok(direction) = to_unit_vector(sun) {
        println!(
            "Sun direction (east, north, up): ({:.3}, {:.3}, {:.3})",
            direction.x, direction.y, direction.z
        );
    }
    if !sun.is_above_horizon() {
        println!("Sun is below the horizon");
    }
    for (index, orientation) in &report.orientations {
        println!(
            "Mirror {}: Elevation = {:.2}°, Azimuth = {:.2}°",
            index + 1,
            orientation.elevation,
            orientation.azimuth
        );
    }
    println!();
}

fn print_result(result: &TrackingResult<TickReport>, json: bool) {
    match result {
        Ok(report) => print_report(report, json),
        Err(e) => eprintln!("Tick failed: {}", e),
    }
}

/// Replay one day over the default field using simulated time
fn demo(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let manager = ConfigurationManager::new();
    let field = manager.build_field()?;
    let tracking = TrackingConfig {
        max_ticks: Some(15),
        ..manager.get_config().tracking.clone()
    };

    let start = Utc
        .with_ymd_and_hms(2024, 6, 21, 1, 0, 0)
        .single()
        .ok_or("invalid demo start time")?;

    let mut scheduler = TrackingScheduler::new(field, ApproximateEphemeris::new(), tracking);
    let ticks = scheduler.run_simulated(start, Duration::hours(1), |result| print_result(result, json))?;

    let state = scheduler.get_state();
    info!(
        "demo complete: {} ticks, {} errors, avg {} us per tick",
        ticks, state.error_count, state.avg_computation_time_us
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let mut args: Vec<String> = std::env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "heliostat".to_string());

    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    if args.len() == 2 && args[1] == "--demo" {
        return demo(json);
    }

    if args.len() == 3 && args[1] == "--write-config" {
        let mut manager = ConfigurationManager::new();
        manager.save_to_file(&args[2])?;
        println!("Default configuration written to {}", args[2]);
        return Ok(());
    }

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <config.json> [ticks] [--json]", program);
        eprintln!("   or: {} --demo [--json]", program);
        eprintln!("   or: {} --write-config <path>", program);
        return Err("Invalid arguments".into());
    }

    let mut scheduler = TrackingScheduler::from_config_file(&args[1], ApproximateEphemeris::new())?;
    if let Some(ticks) = args.get(2) {
        scheduler.set_max_ticks(Some(ticks.parse::<u64>()?));
    }

    let field = scheduler.field();
    info!(
        "tower at {:.4}, {:.4}; focal point {:.1} m above the tower top; {} mirrors",
        field.tower().latitude,
        field.tower().longitude,
        field.focal_height_offset(),
        field.mirror_count()
    );

    scheduler.run(|result| print_result(result, json))?;

    Ok(())
}
