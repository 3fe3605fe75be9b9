//! # Guidance executable
//!
//! Plans every leg of a mission and replays the guidance layer along the
//! planned path, without any vehicle dynamics. The vehicle is placed exactly
//! on each sampled point of the path in turn, so the replay shows the
//! executor's mode sequence and the commands it would give a vehicle which
//! tracks perfectly.
//!
//! Usage: `guid_exec <mission.toml>`

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::env;

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use guid_lib::{
    dubins_exec::DubinsExecMode,
    guidance::Guidance,
    mission::Mission,
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters for the replay
#[derive(Deserialize, Debug)]
struct ReplayParams {
    /// Spacing of the sampled points along each leg
    sample_step_m: f64,
}

/// One sampled point of the planned path
#[derive(Serialize)]
struct SampleRecord {
    leg: usize,
    pos_n_m: f64,
    pos_e_m: f64,
    pos_d_m: f64,
    course_rad: f64,
}

/// One guidance tick of the replay
#[derive(Serialize)]
struct TickRecord {
    tick: usize,
    sim_time_s: f64,
    pos_n_m: f64,
    pos_e_m: f64,
    pos_d_m: f64,
    course_rad: f64,
    leg_index: usize,
    mode: u8,
    path_type: i32,
    crosstrack_m: f64,
    course_cmd_rad: f64,
    altitude_cmd_m: f64,
    course_error_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session = Session::new("guid_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Guidance Executable\n");
    info!(
        "Running on: {}",
        host::get_hostname().unwrap_or_else(|| String::from("unknown host"))
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let mut guidance = Guidance::init("guidance.toml").wrap_err("Failed to initialise guidance")?;
    let guid_params = *guidance.params();
    let replay_params: ReplayParams =
        util::params::load("replay.toml").wrap_err("Could not load replay params")?;

    // ---- LOAD MISSION ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let mission = if args.len() == 2 {
        info!("Loading mission from \"{}\"", &args[1]);
        Mission::from_file(&args[1]).wrap_err("Failed to load the mission")?
    }
    else {
        return Err(eyre!("Expected path to the mission file as only argument"));
    };

    info!(
        "Loaded mission with {} waypoints ({} legs)",
        mission.waypoints_m_ned.len(),
        mission.num_legs()
    );

    // ---- PLAN ----

    let plan = mission
        .plan_legs(guid_params.dubins_exec.turn_radius_m)
        .wrap_err("Failed to plan the mission")?;

    for (k, leg) in plan.legs.iter().enumerate() {
        info!(
            "Leg {}: {:?}, {:.1} m ({:.1} m straight)",
            k + 1,
            leg.case,
            leg.length_m,
            leg.line_length_m()
        );
    }
    info!("Total mission length: {:.1} m\n", plan.total_length_m);

    session.save("mission.json", mission.clone());
    session.save("plan.json", plan.clone());

    // ---- SAMPLE ----

    let mut sample_arch =
        Archiver::from_path(&session, "path_samples.csv").wrap_err("Failed to create archive")?;

    let mut samples = Vec::new();
    for (k, leg) in plan.legs.iter().enumerate() {
        let leg_samples = leg.sample(replay_params.sample_step_m);

        // Each leg starts where the last ended, so drop the repeated point
        let skip = if k == 0 { 0 } else { 1 };

        for s in leg_samples.into_iter().skip(skip) {
            sample_arch
                .serialise(&SampleRecord {
                    leg: k + 1,
                    pos_n_m: s.position_m_ned[0],
                    pos_e_m: s.position_m_ned[1],
                    pos_d_m: s.position_m_ned[2],
                    course_rad: s.course_rad,
                })
                .wrap_err("Failed to archive path sample")?;
            samples.push(s);
        }
    }

    info!("Sampled {} points along the path", samples.len());

    // ---- REPLAY ----

    info!("Begining replay\n");

    let mut tick_arch =
        Archiver::from_path(&session, "guidance.csv").wrap_err("Failed to create archive")?;

    let mut num_transitions = 0;
    let mut last_mode = DubinsExecMode::StartOrbitApproach;

    for (tick, config) in samples.iter().enumerate() {
        let out = guidance
            .step(
                &mission.waypoints_m_ned,
                &mission.courses_rad,
                config,
                tick == 0,
            )
            .wrap_err("Error stepping guidance")?;

        if out.exec.mode != last_mode {
            num_transitions += 1;
            last_mode = out.exec.mode;
        }

        if out.follow.crosstrack_m.abs() > 1.0 {
            warn!(
                "Tick {}: {:.2} m crosstrack error while on the planned path",
                tick, out.follow.crosstrack_m
            );
        }

        tick_arch
            .serialise(&TickRecord {
                tick,
                sim_time_s: tick as f64 * guid_params.period_s,
                pos_n_m: config.position_m_ned[0],
                pos_e_m: config.position_m_ned[1],
                pos_d_m: config.position_m_ned[2],
                course_rad: config.course_rad,
                leg_index: out.exec.leg_index,
                mode: out.exec.mode.number(),
                path_type: out.exec.cmd.path_type().flag(),
                crosstrack_m: out.follow.crosstrack_m,
                course_cmd_rad: out.follow.course_cmd_rad,
                altitude_cmd_m: out.follow.altitude_cmd_m,
                course_error_rad: out.course_error_rad,
            })
            .wrap_err("Failed to archive guidance tick")?;
    }

    let final_state = *guidance.exec().state();
    info!(
        "Replay complete: {} ticks, {} mode changes, finished on leg {} mode {}",
        samples.len(),
        num_transitions,
        final_state.leg_index,
        final_state.mode.number()
    );

    // ---- SHUTDOWN ----

    session.exit();

    Ok(())
}
