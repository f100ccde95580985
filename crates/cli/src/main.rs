use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use hibernus_config::{EndState, ScenarioAssertion, ScenarioScript};
use hibernus_core::sim::{SimBoard, SimContext};
use hibernus_core::snapshot::NodeSnapshot;
use hibernus_core::store::LinearMemory;
use hibernus_core::{EnterOutcome, Node};

const EXIT_ASSERT_FAIL: i32 = 1;
const EXIT_CONFIG_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hibernus intermittent-computing simulator", long_about = None)]
struct Args {
    /// Path to the board descriptor (YAML)
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Path to a power scenario script (YAML); its assertions decide the
    /// exit code
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of power cycles to simulate when no scenario is given
    #[arg(long, default_value = "4")]
    cycles: u64,

    /// Foreground work steps per powered phase
    #[arg(long, default_value = "6")]
    steps: u64,

    /// Enable state-machine execution tracing
    #[arg(short, long)]
    trace: bool,

    /// Write a JSON snapshot of the persistent state after the run
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

type SimNode = Node<SimContext, SimBoard>;

/// Tear down everything volatile, keep the FRAM image. This is what a
/// power cycle does to the node.
fn cold_boot(node: SimNode) -> SimNode {
    let ram_base = node.ram.base_addr;
    let ram_len = node.ram.data.len();
    let mut fresh = Node::new(SimContext::default(), SimBoard::new());
    fresh.fram = node.fram;
    fresh.ram = LinearMemory::new(ram_len, ram_base);
    fresh
}

/// The demo foreground task: count forward in working memory. Progress
/// surviving power cycles is the whole point of the exercise.
fn run_foreground(node: &mut SimNode, steps: u64) -> u64 {
    // Progress lives at the bottom of working memory so it rides along
    // in the mirror.
    let cell = node.ram.base_addr;
    for _ in 0..steps {
        let progress = node.ram.read_u32(cell).unwrap_or(0);
        node.ram.write_u32(cell, progress + 1);
        node.ctx.ctx.pc = node.ctx.ctx.pc.wrapping_add(2);
    }
    node.ram.read_u32(cell).unwrap_or(0) as u64
}

struct RunReport {
    node: SimNode,
    progress: u64,
    fault_flashes: u32,
    end_state: EndState,
}

fn run_cycles(mut node: SimNode, cycles: u64, steps: u64) -> Result<RunReport> {
    let mut progress = 0;
    let mut fault_flashes = 0;
    let mut end_state = EndState::PoweredDown;

    for cycle in 0..cycles {
        node = cold_boot(node);
        let outcome = node.enter()?;
        info!("cycle {}: boot resolved to {:?}", cycle, outcome);
        end_state = match outcome {
            EnterOutcome::Resumed => EndState::Resumed,
            EnterOutcome::ArmedForHibernate => EndState::ArmedForHibernate,
            EnterOutcome::ArmedForRestore => EndState::ArmedForRestore,
        };

        progress = run_foreground(&mut node, steps);
        info!("cycle {}: progress now {}", cycle, progress);

        // Harvested energy runs out.
        if node.board.set_supply(false) {
            node.on_power_edge()?;
        }
        if node.board.powered_down {
            end_state = EndState::PoweredDown;
        }
        fault_flashes += node.board.flash_count;
    }

    Ok(RunReport {
        node,
        progress,
        fault_flashes,
        end_state,
    })
}

fn run_scenario(mut node: SimNode, script: &ScenarioScript) -> Result<RunReport> {
    let mut progress = 0;
    let mut fault_flashes = 0;
    let mut end_state = EndState::PoweredDown;
    let mut booted = false;

    for (i, phase) in script.trace.iter().enumerate() {
        if phase.supply {
            let fired = node.board.set_supply(true);
            if !booted || node.board.powered_down {
                fault_flashes += node.board.flash_count;
                node = cold_boot(node);
                node.board.supply_ok = true;
                let outcome = node.enter()?;
                info!("phase {}: boot resolved to {:?}", i, outcome);
                end_state = match outcome {
                    EnterOutcome::Resumed => EndState::Resumed,
                    EnterOutcome::ArmedForHibernate => EndState::ArmedForHibernate,
                    EnterOutcome::ArmedForRestore => EndState::ArmedForRestore,
                };
                booted = true;
            } else if fired {
                node.on_power_edge()?;
            }
            progress = run_foreground(&mut node, phase.steps);
            info!("phase {}: progress now {}", i, progress);
        } else {
            if node.board.set_supply(false) {
                node.on_power_edge()?;
            }
            if node.board.powered_down {
                end_state = EndState::PoweredDown;
            }
        }
    }

    fault_flashes += node.board.flash_count;
    Ok(RunReport {
        node,
        progress,
        fault_flashes,
        end_state,
    })
}

fn check_assertions(script: &ScenarioScript, report: &RunReport) -> bool {
    let mut ok = true;
    for assertion in &script.assertions {
        match assertion {
            ScenarioAssertion::MinProgress(a) => {
                if report.progress < a.min_progress {
                    warn!(
                        "assertion failed: progress {} < min_progress {}",
                        report.progress, a.min_progress
                    );
                    ok = false;
                }
            }
            ScenarioAssertion::ExpectedEndState(a) => {
                if report.end_state != a.expected_end_state {
                    warn!(
                        "assertion failed: end state {:?}, expected {:?}",
                        report.end_state, a.expected_end_state
                    );
                    ok = false;
                }
            }
            ScenarioAssertion::MaxFaultFlashes(a) => {
                if report.fault_flashes > a.max_fault_flashes {
                    warn!(
                        "assertion failed: {} fault flashes > max {}",
                        report.fault_flashes, a.max_fault_flashes
                    );
                    ok = false;
                }
            }
        }
    }
    ok
}

fn run(args: Args) -> Result<i32> {
    info!("Starting Hibernus Simulator");

    let mut node = if let Some(board_path) = &args.board {
        info!("Loading board descriptor: {:?}", board_path);
        let desc = hibernus_config::BoardDescriptor::from_file(board_path)?;
        hibernus_core::sim::node_from_descriptor(&desc)?
    } else {
        info!("Using default board");
        Node::new(SimContext::default(), SimBoard::new())
    };
    node.board.supply_ok = true;

    let (report, exit_code) = if let Some(scenario_path) = &args.scenario {
        info!("Loading scenario script: {:?}", scenario_path);
        let script = ScenarioScript::from_file(scenario_path)?;
        let report = run_scenario(node, &script)?;
        let code = if check_assertions(&script, &report) {
            0
        } else {
            EXIT_ASSERT_FAIL
        };
        (report, code)
    } else {
        let report = run_cycles(node, args.cycles, args.steps)?;
        (report, 0)
    };

    info!(
        "Run finished: progress {}, end state {:?}, {} fault flashes",
        report.progress, report.end_state, report.fault_flashes
    );

    if let Some(snapshot_path) = &args.snapshot {
        let snap = NodeSnapshot::capture(&report.node);
        std::fs::write(snapshot_path, serde_json::to_string_pretty(&snap)?)?;
        info!("Snapshot written to {:?}", snapshot_path);
    }

    Ok(exit_code)
}

fn main() {
    let args = Args::parse();

    if args.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    }
}
