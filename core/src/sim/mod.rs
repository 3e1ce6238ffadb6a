//! In-memory game surface, lets the bot play without a desktop window.

use crate::*;
pub use engine::*;
pub use layout::*;

mod engine;
mod layout;

/// A simulated minesweeper window: perception renders the running game, input clicks into it.
///
/// The restart button sits just below the field at `(0, height)`. Every restart deals a new layout from the next
/// seed.
#[derive(Clone, Debug)]
pub struct SimulatedGame {
    config: SimConfig,
    seed: u64,
    engine: PlayEngine,
    games_started: u32,
}

impl SimulatedGame {
    pub fn new(config: SimConfig, seed: u64) -> Result<Self> {
        let layout = RandomLayoutGenerator::new(seed).generate(config)?;
        Ok(Self::from_layout(layout, seed))
    }

    /// Starts from a fixed layout, restarts still deal random ones.
    pub fn from_layout(layout: MineLayout, seed: u64) -> Self {
        let config = SimConfig {
            size: layout.size(),
            mines: layout.mine_count(),
        };
        Self {
            config,
            seed,
            engine: PlayEngine::new(layout),
            games_started: 1,
        }
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    pub fn restart_button(&self) -> Position {
        Position::new(0, self.config.size.height)
    }

    fn render(&self, pos: Position) -> CellSymbol {
        let has_mine = self.engine.mine_layout().contains_mine(pos);
        match (self.engine.state(), self.engine.cell_at(pos)) {
            (EngineState::Lost, _) if has_mine => CellSymbol::Mine,
            (EngineState::Won, _) if has_mine => CellSymbol::Win,
            (_, EngineCell::Hidden) => CellSymbol::Hidden,
            (_, EngineCell::Flagged) => CellSymbol::Flagged,
            (_, EngineCell::Revealed(count)) => CellSymbol::Number(count),
        }
    }
}

impl Perception for SimulatedGame {
    fn locate(&mut self) -> Result<Geometry> {
        Ok(Geometry {
            field_size: self.config.size,
            restart_button: self.restart_button(),
        })
    }

    fn capture_board(&mut self) -> Result<CellMap> {
        Ok(self
            .config
            .size
            .positions()
            .map(|pos| (pos, self.render(pos)))
            .collect())
    }
}

/// Clicks on a finished board do nothing, like in the real window.
impl Input for SimulatedGame {
    fn reveal(&mut self, at: Position) -> Result<()> {
        if self.engine.state().is_finished() {
            log::debug!("sim reveal {} ignored, game is over", at);
            return Ok(());
        }
        let outcome = self.engine.reveal(at)?;
        log::debug!("sim reveal {}: {:?}", at, outcome);
        Ok(())
    }

    fn flag(&mut self, at: Position) -> Result<()> {
        if self.engine.state().is_finished() {
            log::debug!("sim flag {} ignored, game is over", at);
            return Ok(());
        }
        log::debug!("sim flag {}", at);
        self.engine.toggle_flag(at)
    }

    fn press_restart(&mut self, at: Position) -> Result<()> {
        if at != self.restart_button() {
            log::warn!("Click at {} missed the restart button", at);
            return Ok(());
        }

        self.seed = self.seed.wrapping_add(1);
        let layout = RandomLayoutGenerator::new(self.seed).generate(self.config)?;
        self.engine = PlayEngine::new(layout);
        self.games_started += 1;
        log::debug!("sim restarted with seed {}", self.seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn capture(game: &mut SimulatedGame) -> BoardSnapshot {
        let size = game.locate().unwrap().field_size;
        BoardSnapshot::from_cells(size, game.capture_board().unwrap()).unwrap()
    }

    fn fixed(size: (Coord, Coord), mines: &[Position]) -> SimulatedGame {
        let layout =
            MineLayout::from_mine_positions(FieldSize::new(size.0, size.1), mines).unwrap();
        SimulatedGame::from_layout(layout, 0)
    }

    #[test]
    fn renders_hidden_board_initially() {
        let mut game = SimulatedGame::new(SimConfig::beginner(), 3).unwrap();

        let snapshot = capture(&mut game);

        assert_eq!(snapshot.count_of(CellSymbol::Hidden), 81);
        assert_eq!(game.locate().unwrap().restart_button, Position::new(0, 9));
    }

    #[test]
    fn loss_shows_every_mine() {
        let mines = [Position::new(0, 0), Position::new(2, 0)];
        let mut game = fixed((3, 2), &mines);

        game.reveal(Position::new(0, 0)).unwrap();
        let snapshot = capture(&mut game);

        let shown: alloc::vec::Vec<_> = snapshot.cells_of_type(CellSymbol::Mine).collect();
        assert_eq!(shown, mines);

        game.reveal(Position::new(1, 1)).unwrap();
        game.flag(Position::new(1, 0)).unwrap();
        assert_eq!(capture(&mut game), snapshot);
    }

    #[test]
    fn win_marks_mines() {
        let mut game = fixed((2, 1), &[Position::new(1, 0)]);

        game.reveal(Position::new(0, 0)).unwrap();

        assert_eq!(capture(&mut game).to_string(), "[ 1 ! ]");
    }

    #[test]
    fn mine_free_config_is_rejected() {
        let config = SimConfig {
            size: FieldSize::new(3, 3),
            mines: 0,
        };

        assert_eq!(
            SimulatedGame::new(config, 0).map(|game| game.games_started()),
            Err(SweepError::NoMines)
        );
    }

    #[test]
    fn restart_deals_a_fresh_game() {
        let mut game = fixed((2, 1), &[Position::new(1, 0)]);
        game.reveal(Position::new(1, 0)).unwrap();
        game.press_restart(Position::new(1, 1)).unwrap();
        assert_eq!(game.games_started(), 1);

        game.press_restart(Position::new(0, 1)).unwrap();

        assert_eq!(game.games_started(), 2);
        assert_eq!(game.engine().state(), EngineState::Ready);
        assert_eq!(capture(&mut game).count_of(CellSymbol::Hidden), 2);
    }

    #[test]
    fn bot_finishes_simulated_games() {
        for seed in 0..8 {
            let game = SimulatedGame::new(SimConfig::beginner(), seed).unwrap();
            let mut ctl = TurnController::start(
                game,
                SmallRng::seed_from_u64(seed),
                ControllerConfig::default(),
            )
            .unwrap();

            let report = ctl.run(&NeverCancel, &mut NoDelay).unwrap();

            assert!(
                matches!(report.outcome, ControllerState::Won | ControllerState::Lost),
                "seed {seed} ended with {:?}",
                report.outcome
            );
            assert_eq!(report.stats.restarts, 0);
        }
    }

    #[test]
    fn bot_restarts_over_stale_loss() {
        let mut game = SimulatedGame::new(SimConfig::beginner(), 11).unwrap();
        let mine = game.engine().mine_layout().mines().next().unwrap();
        game.reveal(mine).unwrap();
        let mut ctl =
            TurnController::start(game, SmallRng::seed_from_u64(1), ControllerConfig::default())
                .unwrap();

        assert_eq!(ctl.step(), Ok(ControllerState::Running));

        assert_eq!(ctl.stats().restarts, 1);
        assert_eq!(ctl.surface().games_started(), 2);
    }
}
