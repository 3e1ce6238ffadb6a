use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::*;

/// Where the board lives, queried once when a run starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub field_size: FieldSize,
    pub restart_button: Position,
}

/// Turns the game on screen into symbols.
pub trait Perception {
    /// Locates the game surface, failing with [`SweepError::EnvironmentUnavailable`] when it cannot be found.
    fn locate(&mut self) -> Result<Geometry>;

    /// Classifies every cell of the field.
    fn capture_board(&mut self) -> Result<CellMap>;
}

/// Blocking activations on the game surface.
pub trait Input {
    fn reveal(&mut self, at: Position) -> Result<()>;

    fn flag(&mut self, at: Position) -> Result<()>;

    /// Single primary click on the restart button, `at` is outside the field.
    fn press_restart(&mut self, at: Position) -> Result<()>;
}

/// Waits between turns so the game can settle.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Pacer that never waits.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&mut self, _delay: Duration) {}
}

/// Cooperative stop request, polled between turns only.
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

/// Signal that never fires.
#[derive(Copy, Clone, Debug, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub turn_delay: Duration,
}

impl ControllerConfig {
    pub const DEFAULT_TURN_DELAY: Duration = Duration::from_millis(150);
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            turn_delay: Self::DEFAULT_TURN_DELAY,
        }
    }
}

/// Valid transitions:
/// - Starting -> Running
/// - Running -> Running
/// - Starting | Running -> any final state
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    Starting,
    Running,
    Won,
    Lost,
    /// Perception reported cells it could not classify.
    Blocked,
    Cancelled,
    /// Logic exhaustion or a collaborator failure.
    Fatal,
}

impl ControllerState {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Starting | Self::Running)
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::Starting
    }
}

/// Actions issued over a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub reveals: CellCount,
    pub flags: CellCount,
    pub deductions: CellCount,
    pub guesses: CellCount,
    pub restarts: CellCount,
}

impl RunStats {
    fn record(&mut self, action: &Action) {
        self.reveals += action.reveals.len() as CellCount;
        self.flags += action.flags.len() as CellCount;
        match action.reason {
            ActionReason::Deduction { .. } => self.deductions += 1,
            ActionReason::FirstMove | ActionReason::Guess => self.guesses += 1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: ControllerState,
    pub turns: TurnNumber,
    pub stats: RunStats,
}

/// Drives the observe, decide, act, wait loop against a game surface.
#[derive(Debug)]
pub struct TurnController<G, R> {
    surface: G,
    engine: InferenceEngine<R>,
    geometry: Geometry,
    config: ControllerConfig,
    turn: TurnNumber,
    state: ControllerState,
    stats: RunStats,
}

impl<G, R> TurnController<G, R>
where
    G: Perception + Input,
    R: RngCore,
{
    /// Locates the game surface, no turn is played when that fails.
    pub fn start(mut surface: G, rng: R, config: ControllerConfig) -> Result<Self> {
        let geometry = surface.locate().map_err(|err| {
            log::error!("Can not find game surface: {}", err);
            SweepError::EnvironmentUnavailable
        })?;
        if geometry.field_size.is_empty() {
            log::error!("Game surface reports an empty field");
            return Err(SweepError::EnvironmentUnavailable);
        }
        log::info!("Field size: {}", geometry.field_size);

        Ok(Self {
            surface,
            engine: InferenceEngine::new(rng, geometry.restart_button),
            geometry,
            config,
            turn: 0,
            state: ControllerState::Starting,
            stats: RunStats::default(),
        })
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn turn(&self) -> TurnNumber {
        self.turn
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn surface(&self) -> &G {
        &self.surface
    }

    pub fn into_surface(self) -> G {
        self.surface
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            outcome: self.state,
            turns: self.turn,
            stats: self.stats,
        }
    }

    /// Plays turns until a final state, pausing between turns and honoring `cancel` at each turn boundary.
    pub fn run<C, P>(&mut self, cancel: &C, pacer: &mut P) -> Result<RunReport>
    where
        C: CancelSignal + ?Sized,
        P: Pacer,
    {
        loop {
            if cancel.is_cancelled() {
                log::info!("Exiting now");
                self.state = ControllerState::Cancelled;
                break;
            }

            if self.step()?.is_finished() {
                break;
            }

            pacer.pause(self.config.turn_delay);
        }

        let report = self.report();
        log::info!(
            "Run finished after {} turns: {:?}, {} reveals, {} flags, {} guesses",
            report.turns,
            report.outcome,
            report.stats.reveals,
            report.stats.flags,
            report.stats.guesses
        );
        Ok(report)
    }

    /// Plays exactly one turn.
    pub fn step(&mut self) -> Result<ControllerState> {
        if self.state.is_finished() {
            return Err(SweepError::AlreadyEnded);
        }
        self.state = ControllerState::Running;

        self.turn += 1;
        log::info!("Turn {}", self.turn);

        match self.play_turn() {
            Ok(state) => {
                self.state = state;
                Ok(state)
            }
            Err(err) => {
                log::error!("Turn {} failed: {}", self.turn, err);
                self.state = ControllerState::Fatal;
                Err(err)
            }
        }
    }

    fn play_turn(&mut self) -> Result<ControllerState> {
        let cells = self.surface.capture_board()?;
        let snapshot = BoardSnapshot::from_cells(self.geometry.field_size, cells)?;
        log::debug!("Board:\n{}", snapshot);

        let verdict = self.engine.decide(&snapshot, self.turn);
        self.dispatch(verdict)
    }

    fn dispatch(&mut self, verdict: Verdict) -> Result<ControllerState> {
        use ControllerState::*;

        Ok(match verdict {
            Verdict::Act(action) => {
                match action.reason {
                    ActionReason::FirstMove => {
                        log::info!("All cells are hidden, revealing {:?}", action.reveals)
                    }
                    ActionReason::Deduction { clue } if !action.flags.is_empty() => {
                        log::info!("Flagging {:?} around {}", action.flags, clue)
                    }
                    ActionReason::Deduction { clue } => {
                        log::info!("Revealing {:?}, {} has all its flags", action.reveals, clue)
                    }
                    ActionReason::Guess => {
                        log::warn!("No deduction applies, guessing {:?}", action.reveals)
                    }
                }

                for &pos in &action.reveals {
                    self.surface.reveal(pos)?;
                }
                for &pos in &action.flags {
                    self.surface.flag(pos)?;
                }
                self.stats.record(&action);
                Running
            }
            Verdict::Restart(at) => {
                log::info!("Board shows a finished game, restarting");
                self.surface.press_restart(at)?;
                self.stats.restarts += 1;
                Running
            }
            Verdict::Won => {
                log::info!("Board cleared, game won");
                Won
            }
            Verdict::Lost => {
                log::info!("Mine hit, game over");
                Lost
            }
            Verdict::BlockedUnknownCells => {
                log::warn!("Unknown cells on the board, refusing to continue");
                Blocked
            }
            Verdict::NoMoveFound => {
                log::error!("No hidden cells left but the game is not over");
                Fatal
            }
        })
    }
}
