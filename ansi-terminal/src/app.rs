use crate::render;
use chargrid::{control_flow::*, core::app, input::*, prelude::*, text::StyledString};
use forage_game::{ExternalEvent, Game, SearchKind};

const STATUS_STYLE: Style = Style::new()
    .with_bold(false)
    .with_foreground(Rgba32::new_grey(255));

/// Conditions under which the app exits on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct Limits {
    pub frames: Option<u64>,
    pub food: Option<u64>,
}

pub fn log_event(event: ExternalEvent) {
    match event {
        ExternalEvent::PathNotFound(kind) => log::info!("{} found no path", kind),
        ExternalEvent::FoodConsumed(coord) => log::info!("ate food at {:?}", coord),
        other => log::debug!("{:?}", other),
    }
}

struct ForageState {
    game: Game,
    limits: Limits,
    frames: u64,
}

impl ForageState {
    fn limit_reached(&self) -> bool {
        self.limits
            .frames
            .map_or(false, |frames| self.frames >= frames)
            || self
                .limits
                .food
                .map_or(false, |food| self.game.food_consumed() >= food)
    }

    fn handle_key(&mut self, ch: char) {
        match ch {
            '1'..='5' => {
                let index = ch as usize - '1' as usize;
                self.game.select_strategy(Some(SearchKind::ALL[index]));
            }
            'r' => {
                if let Err(e) = self.game.reset() {
                    log::error!("{}", e);
                }
            }
            _ => (),
        }
    }
}

struct ForageComponent;

impl Component for ForageComponent {
    type Output = Option<()>;
    type State = ForageState;

    fn render(&self, state: &Self::State, ctx: Ctx, fb: &mut FrameBuffer) {
        render::render_grid(state.game.grid(), ctx, fb);
        let below_grid = state.game.size().height() as i32 + 1;
        StyledString {
            string: render::status_line(&state.game),
            style: STATUS_STYLE,
        }
        .render(&(), ctx.add_y(below_grid), fb);
        StyledString {
            string: render::HELP.to_string(),
            style: STATUS_STYLE,
        }
        .render(&(), ctx.add_y(below_grid + 1), fb);
    }

    fn update(&mut self, state: &mut Self::State, _ctx: Ctx, event: Event) -> Self::Output {
        match event {
            Event::Input(Input::Keyboard(KeyboardInput::Char(ch))) => state.handle_key(ch),
            Event::Tick(since_previous) => {
                state.frames += 1;
                if let Err(e) = state.game.handle_tick(since_previous) {
                    log::error!("{}", e);
                    return Some(());
                }
            }
            _ => (),
        }
        state.game.events().for_each(log_event);
        if state.limit_reached() {
            log::info!(
                "{} food eaten in {} frames",
                state.game.food_consumed(),
                state.frames
            );
            Some(())
        } else {
            None
        }
    }

    fn size(&self, _state: &Self::State, ctx: Ctx) -> Size {
        ctx.bounding_box.size()
    }
}

pub fn app(game: Game, limits: Limits) -> impl Component<Output = app::Output, State = ()> {
    let state = ForageState {
        game,
        limits,
        frames: 0,
    };
    cf(ForageComponent)
        .catch_escape()
        .map(|_| app::Exit)
        .with_state(state)
        .clear_each_frame()
        .exit_on_close()
}
