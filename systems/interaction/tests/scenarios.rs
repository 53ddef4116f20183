use palxel_core::{
    ActorId, ActorKind, Command, Event, GlobalPixel, Host, Position, RegionId, Rgb, CELL_COUNT,
};
use palxel_system_animation::AnimationState;
use palxel_system_directory::Directory;
use palxel_system_interaction::{Config, Form, FormResponse, Palxel, Prompt};
use palxel_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const OPEN_MENU: &str = "palxel:palxel";
const TOGGLE: &str = "palxel:palxel_anim";

struct Session {
    world: World,
    palxel: Palxel<ChaCha8Rng>,
}

impl Session {
    fn new() -> Self {
        Self {
            world: World::new(),
            palxel: Palxel::new(Config::default(), ChaCha8Rng::seed_from_u64(0x9a1e)),
        }
    }

    fn run(&mut self, command: Command) -> (Vec<Event>, Vec<Prompt>) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let mut prompts = Vec::new();
        self.palxel.handle(&events, &mut self.world, &mut prompts);
        (events, prompts)
    }

    fn join(&mut self, kind: ActorKind, position: Position) -> ActorId {
        let (events, _) = self.run(Command::JoinActor {
            kind,
            region: RegionId::Overworld,
            position,
        });
        match events.as_slice() {
            [Event::ActorJoined { actor }] => *actor,
            other => panic!("unexpected join events: {other:?}"),
        }
    }

    fn move_to(&mut self, actor: ActorId, position: Position) {
        let _ = self.run(Command::MoveActor {
            actor,
            region: RegionId::Overworld,
            position,
        });
    }

    fn trigger(&mut self, id: &str, source: Option<ActorId>) -> Vec<Prompt> {
        self.run(Command::SendScriptEvent {
            id: id.to_owned(),
            source,
        })
        .1
    }

    fn open_menu(&mut self, user: ActorId) -> Form {
        let mut prompts = self.trigger(OPEN_MENU, Some(user));
        assert_eq!(prompts.len(), 1, "expected one menu prompt");
        let prompt = prompts.remove(0);
        assert_eq!(prompt.user, user);
        prompt.form
    }

    fn answer(&mut self, user: ActorId, response: FormResponse) -> Option<Form> {
        let mut prompts = Vec::new();
        self.palxel
            .respond(&mut self.world, user, response, &mut prompts);
        assert!(prompts.len() <= 1);
        prompts.pop().map(|prompt| {
            assert_eq!(prompt.user, user);
            prompt.form
        })
    }

    fn settle(&mut self) {
        while self.palxel.is_spawning() {
            let _ = self.run(Command::Tick);
        }
    }

    fn spawn_grid(&mut self, user: ActorId) {
        let form = self.open_menu(user);
        assert_eq!(buttons(&form).len(), 1, "empty grid offers only the spawn button");
        assert_eq!(self.answer(user, FormResponse::Selection(0)), None);
        self.settle();
        assert_eq!(self.live_cells(), CELL_COUNT as usize);
    }

    fn live_cells(&self) -> usize {
        self.palxel.live_cells(&self.world)
    }

    fn notices_for(&mut self, user: ActorId) -> Vec<String> {
        self.world
            .drain_notices()
            .into_iter()
            .filter(|notice| notice.to == user)
            .map(|notice| notice.text)
            .collect()
    }

    fn pixel_hex(&self, column: u32, row: u32) -> Option<String> {
        let pixel = GlobalPixel::new(column, row).expect("pixel in range");
        self.palxel.raster(&self.world).get(pixel).map(Rgb::to_hex)
    }
}

fn buttons(form: &Form) -> &[String] {
    match form {
        Form::Action(form) => &form.buttons,
        Form::Modal(form) => panic!("expected a button list, got sliders `{}`", form.title),
    }
}

fn button_index(form: &Form, prefix: &str) -> usize {
    buttons(form)
        .iter()
        .position(|label| label.starts_with(prefix))
        .unwrap_or_else(|| panic!("no button starting with `{prefix}` in {form:?}"))
}

/// Walks root menu -> cell -> pixel and returns the open editor.
fn open_editor(session: &mut Session, user: ActorId, cell: &str, slot: usize) -> Form {
    let root = session.open_menu(user);
    let picker = session
        .answer(user, FormResponse::Selection(button_index(&root, cell)))
        .expect("cell picker");
    assert_eq!(buttons(&picker).len(), 33);
    session
        .answer(user, FormResponse::Selection(slot))
        .expect("rgb editor")
}

#[test]
fn edit_one_pixel_end_to_end() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::new(0.0, 0.0, 0.0));
    session.spawn_grid(player);
    assert_eq!(session.notices_for(player), vec!["Spawning grid...".to_owned()]);

    session.move_to(player, Position::new(5.0, 0.0, 0.0));
    let root = session.open_menu(player);
    assert!(buttons(&root)[1].starts_with("#5 [5,0] [0.0m]"));

    let editor = open_editor(&mut session, player, "#5 [5,0]", 9);
    let Form::Modal(modal) = &editor else {
        panic!("expected sliders, got {editor:?}");
    };
    assert_eq!(modal.title, "px[41,1] - RGB");
    assert_eq!(modal.sliders.len(), 3);
    assert!(modal.sliders.iter().all(|slider| slider.default == 0.0));
    assert!(modal.sliders.iter().all(|slider| slider.max == 255.0 && slider.step == 1.0));

    let next = session.answer(player, FormResponse::Values(vec![12.0, 34.0, 56.0]));
    assert_eq!(next, None);
    assert_eq!(session.pixel_hex(41, 1).as_deref(), Some("0C2238"));

    let notices = session.notices_for(player);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].starts_with("px[41,1] -> #0C2238 RGB(12,34,56)"), "{notices:?}");
}

#[test]
fn editor_prefills_the_current_colour_and_rounds_input() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());
    session.spawn_grid(player);

    let _ = open_editor(&mut session, player, "#0 ", 0);
    let _ = session.answer(player, FormResponse::Values(vec![254.6, 0.4, 300.0]));
    assert_eq!(session.pixel_hex(0, 0).as_deref(), Some("FF00FF"));

    let editor = open_editor(&mut session, player, "#0 ", 0);
    let Form::Modal(modal) = editor else {
        panic!("expected sliders");
    };
    let defaults: Vec<f64> = modal.sliders.iter().map(|slider| slider.default).collect();
    assert_eq!(defaults, vec![255.0, 0.0, 255.0]);
}

#[test]
fn reset_before_confirm_turns_the_edit_into_not_found() {
    let mut session = Session::new();
    let editor_user = session.join(ActorKind::Player, Position::default());
    let other = session.join(ActorKind::Player, Position::new(3.0, 0.0, 0.0));
    session.spawn_grid(editor_user);
    let _ = session.notices_for(editor_user);

    let _ = open_editor(&mut session, editor_user, "#0 ", 3);

    let root = session.open_menu(other);
    let reset = buttons(&root).len() - 1;
    let confirm = session
        .answer(other, FormResponse::Selection(reset))
        .expect("reset confirmation");
    assert_eq!(buttons(&confirm).len(), 2);
    assert_eq!(session.answer(other, FormResponse::Selection(0)), None);
    session.settle();

    assert_eq!(
        session.answer(editor_user, FormResponse::Values(vec![255.0, 255.0, 255.0])),
        None
    );
    assert_eq!(session.notices_for(editor_user), vec!["Grid cell not found".to_owned()]);
    assert_eq!(session.pixel_hex(3, 0).as_deref(), Some("000000"));
}

#[test]
fn cell_removed_before_pick_is_reported_not_found() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());
    session.spawn_grid(player);
    let _ = session.notices_for(player);

    let root = session.open_menu(player);
    let cell = session
        .palxel
        .raster(&session.world)
        .get(GlobalPixel::new(0, 0).expect("pixel"));
    assert!(cell.is_some());

    let victims: Vec<_> = session
        .world
        .list_entities(RegionId::Overworld, palxel_core::CELL_ENTITY_TYPE)
        .expect("list");
    session.world.remove(victims[0]).expect("remove cell 0");

    let selection = button_index(&root, "#0 ");
    assert_eq!(session.answer(player, FormResponse::Selection(selection)), None);
    assert_eq!(session.notices_for(player), vec!["Grid cell not found".to_owned()]);
}

#[test]
fn cell_removed_while_picking_a_pixel_opens_no_editor() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());
    session.spawn_grid(player);
    let _ = session.notices_for(player);

    let root = session.open_menu(player);
    let picker = session
        .answer(player, FormResponse::Selection(button_index(&root, "#0 ")))
        .expect("cell picker");
    assert!(picker.title().starts_with("Cell [0,0]"));

    let cell = Directory::default()
        .resolve(&session.world, 0)
        .expect("cell 0 is live");
    session.world.remove(cell).expect("remove cell 0");

    assert_eq!(session.answer(player, FormResponse::Selection(3)), None);
    assert_eq!(session.notices_for(player), vec!["Grid cell not found".to_owned()]);
    assert!(!session.palxel.is_waiting(player));
}

#[test]
fn cell_picker_reset_button_asks_for_confirmation() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());
    session.spawn_grid(player);
    let _ = session.notices_for(player);

    let root = session.open_menu(player);
    let picker = session
        .answer(player, FormResponse::Selection(button_index(&root, "#0 ")))
        .expect("cell picker");
    assert!(buttons(&picker)[32].starts_with("Reset"));

    let confirm = session
        .answer(player, FormResponse::Selection(32))
        .expect("reset confirmation");
    assert_eq!(confirm.title(), "Confirm reset");
    assert_eq!(buttons(&confirm).len(), 2);

    assert_eq!(session.answer(player, FormResponse::Selection(0)), None);
    assert!(session.palxel.is_spawning());
    assert_eq!(
        session.notices_for(player),
        vec!["Grid reset. Spawning grid...".to_owned()]
    );
    session.settle();
    assert_eq!(session.live_cells(), CELL_COUNT as usize);
}

#[test]
fn spawn_into_unloaded_region_tells_the_requester_once() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());

    let _ = session.open_menu(player);
    assert_eq!(session.answer(player, FormResponse::Selection(0)), None);
    let _ = session.run(Command::SetRegionLoaded {
        region: RegionId::Overworld,
        loaded: false,
    });
    session.settle();

    assert_eq!(
        session.notices_for(player),
        vec![
            "Spawning grid...".to_owned(),
            "Grid spawn failed: region overworld is unavailable".to_owned(),
        ]
    );
    let _ = session.run(Command::SetRegionLoaded {
        region: RegionId::Overworld,
        loaded: true,
    });
    assert_eq!(session.live_cells(), 0);
}

#[test]
fn root_menu_lists_ten_nearest_cells_in_distance_order() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());
    session.spawn_grid(player);

    session.move_to(player, Position::new(7.0, 4.0, 0.0));
    let root = session.open_menu(player);
    let labels = buttons(&root);
    assert_eq!(labels.len(), 12);
    assert!(labels[0].contains("[OFF]"));
    assert!(labels[1].starts_with("#71 [7,8] [0.0m]"), "{labels:?}");
    assert!(labels[11].starts_with("Reset"));

    let distances: Vec<f64> = labels[1..11]
        .iter()
        .map(|label| {
            let start = label.rfind('[').expect("distance bracket") + 1;
            label[start..label.len() - 2].parse().expect("distance")
        })
        .collect();
    assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]), "{distances:?}");
}

#[test]
fn cancel_at_any_level_mutates_nothing() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());

    let _ = session.open_menu(player);
    assert_eq!(session.answer(player, FormResponse::Canceled), None);
    assert_eq!(session.live_cells(), 0);
    assert!(!session.palxel.is_spawning());

    session.spawn_grid(player);
    let _ = open_editor(&mut session, player, "#0 ", 0);
    assert_eq!(session.answer(player, FormResponse::Canceled), None);
    assert!(!session.palxel.is_waiting(player));

    let root = session.open_menu(player);
    let reset = buttons(&root).len() - 1;
    let _ = session.answer(player, FormResponse::Selection(reset));
    assert_eq!(session.answer(player, FormResponse::Selection(1)), None);
    assert!(!session.palxel.is_spawning());
    assert_eq!(session.pixel_hex(0, 0).as_deref(), Some("000000"));
}

#[test]
fn animation_stops_on_reset_and_grid_comes_back_black() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());
    session.spawn_grid(player);
    let _ = session.notices_for(player);

    let _ = session.trigger(TOGGLE, Some(player));
    assert_eq!(session.palxel.animation_state(), AnimationState::Running);
    assert_eq!(session.notices_for(player), vec!["Random animation: ON".to_owned()]);
    for _ in 0..3 {
        let _ = session.run(Command::Tick);
    }
    let raster = session.palxel.raster(&session.world);
    assert!(raster.rows().flatten().any(|pixel| *pixel != Some(Rgb::BLACK)));

    let root = session.open_menu(player);
    assert!(buttons(&root)[0].contains("[ON]"));
    let reset = buttons(&root).len() - 1;
    let _ = session.answer(player, FormResponse::Selection(reset));
    let _ = session.answer(player, FormResponse::Selection(0));
    assert_eq!(session.palxel.animation_state(), AnimationState::Stopped);

    session.settle();
    for _ in 0..5 {
        let _ = session.run(Command::Tick);
    }
    assert_eq!(query::pending_tasks(&session.world), 0);
    let raster = session.palxel.raster(&session.world);
    assert_eq!(raster.resolved(), 2304);
    assert!(raster.rows().flatten().all(|pixel| *pixel == Some(Rgb::BLACK)));
}

#[test]
fn toggle_from_root_menu_flips_the_animation() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());
    session.spawn_grid(player);
    let _ = session.notices_for(player);

    let _ = session.open_menu(player);
    assert_eq!(session.answer(player, FormResponse::Selection(0)), None);
    assert_eq!(session.palxel.animation_state(), AnimationState::Running);

    let _ = session.trigger(TOGGLE, Some(player));
    assert_eq!(session.palxel.animation_state(), AnimationState::Stopped);
    assert_eq!(
        session.notices_for(player),
        vec![
            "Random animation: ON".to_owned(),
            "Random animation: OFF".to_owned()
        ]
    );
}

#[test]
fn non_player_and_foreign_triggers_are_dropped() {
    let mut session = Session::new();
    let mob = session.join(ActorKind::Other, Position::default());

    assert!(session.trigger(OPEN_MENU, Some(mob)).is_empty());
    assert!(session.trigger(OPEN_MENU, None).is_empty());
    assert!(session.trigger(TOGGLE, Some(mob)).is_empty());
    assert_eq!(session.palxel.animation_state(), AnimationState::Stopped);

    let player = session.join(ActorKind::Player, Position::default());
    assert!(session.trigger("elsewhere:palxel", Some(player)).is_empty());
    assert!(session.trigger("palxel:unknown", Some(player)).is_empty());
    assert!(session.world.drain_notices().is_empty());
}

#[test]
fn answer_without_open_dialog_is_ignored() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());
    assert_eq!(session.answer(player, FormResponse::Selection(0)), None);
    assert_eq!(session.live_cells(), 0);
    assert!(!session.palxel.is_spawning());
}

#[test]
fn reset_anchors_at_the_confirming_users_current_position() {
    let mut session = Session::new();
    let player = session.join(ActorKind::Player, Position::default());
    session.spawn_grid(player);

    let root = session.open_menu(player);
    let reset = buttons(&root).len() - 1;
    let _ = session.answer(player, FormResponse::Selection(reset));
    session.move_to(player, Position::new(50.0, 10.0, 2.0));
    let _ = session.answer(player, FormResponse::Selection(0));
    session.settle();

    let cells = session
        .world
        .list_entities(RegionId::Overworld, palxel_core::CELL_ENTITY_TYPE)
        .expect("list");
    assert_eq!(cells.len(), CELL_COUNT as usize);
    assert_eq!(session.world.position(cells[0]), Ok(Position::new(50.0, 10.0, 2.0)));
}
