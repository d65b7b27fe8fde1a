//! The game controller - owns the scheduler, interaction chain, chunk registry,
//! and streaming, and drives them once per frame.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use overworld::directory::clear_directory;
use overworld::{
    Character, CharacterInstance, ChunkStore, InteractionId, StoryFlags, TileInstance, WorldConfig,
    WorldPosition,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::activity::{Activity, ActivityScheduler, FrameInput};
use crate::collaborators::{CharacterDirectory, SceneLoader};
use crate::error::CoreError;
use crate::interaction_chain::{ChainStep, InteractionChain};
use crate::roster::CharacterRoster;
use crate::streaming::{
    ChunkRegistry, ChunkRenderer, PassStatus, PassSummary, StreamingEnv, StreamingPass,
    StreamingRequest,
};
use crate::ui::UiPanels;

/// The owning context a controller registers itself in. At most one
/// controller may be alive per context.
#[derive(Debug, Clone, Default)]
pub struct ControllerContext {
    occupied: Rc<Cell<bool>>,
}

impl ControllerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_controller(&self) -> bool {
        self.occupied.get()
    }

    fn register(&self) -> Result<Registration, CoreError> {
        if self.occupied.replace(true) {
            return Err(CoreError::DuplicateController);
        }
        Ok(Registration(Rc::clone(&self.occupied)))
    }
}

/// Frees the context slot when the controller is dropped.
#[derive(Debug)]
struct Registration(Rc<Cell<bool>>);

impl Drop for Registration {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A saved destination: a scene and a spot in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpPoint {
    pub scene: String,
    pub position: WorldPosition,
}

/// The services a controller calls into.
pub struct Collaborators {
    pub ui: UiPanels,
    pub scenes: Box<dyn SceneLoader>,
    pub chunks: Arc<dyn ChunkStore>,
    pub characters: Box<dyn CharacterDirectory>,
}

pub struct GameController {
    _registration: Registration,
    config: WorldConfig,

    ui: UiPanels,
    scenes: Box<dyn SceneLoader>,
    chunks: Arc<dyn ChunkStore>,
    character_dir: Box<dyn CharacterDirectory>,

    scheduler: ActivityScheduler,
    chain: InteractionChain,
    flags: StoryFlags,

    registry: ChunkRegistry,
    roster: CharacterRoster,
    current_scene: String,
    player_position: WorldPosition,
    /// Chunk anchor the latest pass was built around.
    streamed_anchor: Option<(i32, i32)>,
    pass: Option<StreamingPass>,
    last_pass: Option<PassSummary>,
}

impl GameController {
    /// Register in `context`, empty the scratch chunk-layer directory, hide all
    /// panels, place the player renderer, and show the title panel.
    ///
    /// Fails if `context` already holds a controller.
    pub fn new(
        context: &ControllerContext,
        config: WorldConfig,
        collaborators: Collaborators,
    ) -> Result<Self, CoreError> {
        let registration = context.register()?;
        clear_directory(&config.temp_chunk_layer_path())?;

        let Collaborators {
            ui,
            scenes,
            chunks,
            characters,
        } = collaborators;

        let mut controller = Self {
            _registration: registration,
            current_scene: config.initial_scene.clone(),
            config,
            ui,
            scenes,
            chunks,
            character_dir: characters,
            scheduler: ActivityScheduler::new(),
            chain: InteractionChain::new(),
            flags: StoryFlags::new(),
            registry: ChunkRegistry::new(),
            roster: CharacterRoster::new(),
            player_position: WorldPosition::default(),
            streamed_anchor: None,
            pass: None,
            last_pass: None,
        };

        controller.ui.disable_all();
        controller.registry.register(ChunkRenderer::for_player());
        controller.ui.title.show();
        info!(scene = %controller.current_scene, "controller_started");
        Ok(controller)
    }

    /// Run one frame: update, then late update.
    pub fn frame(&mut self, input: &FrameInput) {
        self.update(input);
        self.late_update();
    }

    /// Tick the current activity, then advance any streaming pass one unit.
    pub fn update(&mut self, input: &FrameInput) {
        self.scheduler.tick(input, &mut self.ui, &mut self.flags);
        self.advance_streaming();
    }

    /// Merge new activities, retire a finished one, and continue the
    /// interaction chain if the queue drained.
    pub fn late_update(&mut self) {
        self.scheduler.commit();

        if !self.scheduler.has_activity() {
            if let ChainStep::Continued(id) = self.chain.resolve(&mut self.scheduler, &self.flags) {
                debug!(interaction = %id, "interaction_continued");
            }
        }
    }

    // Activities

    pub fn enqueue_activity(&mut self, activity: Box<dyn Activity>) {
        self.scheduler.enqueue(activity);
    }

    pub fn current_activity(&self) -> Option<&dyn Activity> {
        self.scheduler.current_activity()
    }

    pub fn next_activity(&self) -> Option<&dyn Activity> {
        self.scheduler.next_activity()
    }

    pub fn has_activity(&self) -> bool {
        self.scheduler.has_activity()
    }

    pub fn control_enabled(&self) -> bool {
        self.scheduler.control_enabled()
    }

    pub fn set_control_disabled(&mut self, disabled: bool) {
        self.scheduler.set_control_disabled(disabled);
    }

    pub fn scheduler(&self) -> &ActivityScheduler {
        &self.scheduler
    }

    // Interactions

    /// Set the active interaction context without queueing anything.
    pub fn process_interaction(
        &mut self,
        interactor: Arc<Character>,
        instance: CharacterInstance,
        interaction: InteractionId,
    ) {
        self.chain.process(interactor, instance, interaction);
    }

    /// Start an interaction chain at `interaction`.
    pub fn begin_interaction(
        &mut self,
        interactor: Arc<Character>,
        instance: CharacterInstance,
        interaction: InteractionId,
    ) -> bool {
        self.chain
            .begin(interactor, instance, interaction, &mut self.scheduler)
    }

    /// Talk to a placed character, starting at its instance's initial
    /// interaction. False if the character isn't here or has nothing to say.
    pub fn interact_with(&mut self, name: &str) -> bool {
        let Some(instance) = self.roster.find_instance(name).cloned() else {
            return false;
        };
        let Some(start) = instance.initial_interaction else {
            return false;
        };
        let Some(interactor) = self.roster.character(name).cloned() else {
            return false;
        };
        self.begin_interaction(interactor, instance, start)
    }

    pub fn interaction_chain(&self) -> &InteractionChain {
        &self.chain
    }

    pub fn flags(&self) -> &StoryFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut StoryFlags {
        &mut self.flags
    }

    // Scenes and streaming

    pub fn current_scene(&self) -> &str {
        &self.current_scene
    }

    /// Switch scenes: hide the title panel and stream the area around the
    /// player with progress. The old scene is torn down only if the name
    /// actually changed.
    pub fn set_current_scene(&mut self, scene: impl Into<String>) -> Result<(), CoreError> {
        self.ensure_idle()?;
        let scene = scene.into();
        let last_scene = std::mem::replace(&mut self.current_scene, scene);
        self.ui.title.hide();

        let scene_changed = last_scene != self.current_scene;
        info!(from = %last_scene, to = %self.current_scene, scene_changed, "scene_change_requested");
        self.start_load_area_around_player(StreamingRequest::scene_entry(scene_changed))
    }

    /// Begin a streaming pass around the player. The first unit of work runs
    /// immediately; the rest run one per frame.
    pub fn start_load_area_around_player(&mut self, request: StreamingRequest) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.begin_pass(request);
        Ok(())
    }

    fn begin_pass(&mut self, request: StreamingRequest) {
        self.streamed_anchor = Some(self.player_anchor());
        self.pass = Some(StreamingPass::new(
            self.current_scene.clone(),
            self.player_position,
            request,
        ));
        self.advance_streaming();
    }

    pub fn is_streaming(&self) -> bool {
        self.pass.is_some()
    }

    /// Summary of the most recently finished pass.
    pub fn last_pass(&self) -> Option<&PassSummary> {
        self.last_pass.as_ref()
    }

    fn ensure_idle(&self) -> Result<(), CoreError> {
        match &self.pass {
            Some(pass) => Err(CoreError::StreamingInProgress {
                scene: pass.scene().to_string(),
            }),
            None => Ok(()),
        }
    }

    fn advance_streaming(&mut self) {
        let Some(pass) = self.pass.as_mut() else {
            return;
        };

        let mut env = StreamingEnv {
            chunk_size: (self.config.chunk_width, self.config.chunk_height),
            store: self.chunks.as_ref(),
            registry: &mut self.registry,
            scenes: self.scenes.as_mut(),
            progress: self.ui.progress.as_mut(),
            characters: self.character_dir.as_ref(),
            roster: &mut self.roster,
            scheduler: &mut self.scheduler,
        };

        if pass.advance(&mut env) != PassStatus::Complete {
            return;
        }
        self.last_pass = self.pass.take().map(StreamingPass::into_summary);

        // The player may have left the cell while the pass ran.
        let anchor = self.player_anchor();
        if self.streamed_anchor != Some(anchor) {
            debug!(x = anchor.0, y = anchor.1, "streaming_resync");
            self.begin_pass(StreamingRequest::background());
        }
    }

    // Player

    pub fn player_position(&self) -> WorldPosition {
        self.player_position
    }

    fn player_anchor(&self) -> (i32, i32) {
        self.player_position
            .floor_to_chunk(self.config.chunk_width, self.config.chunk_height)
    }

    /// Move the player. When they cross into a new chunk cell and no pass is
    /// running, a quiet streaming pass starts. Returns whether one started.
    /// A crossing during a pass is picked up when that pass finishes.
    pub fn update_player_position(&mut self, position: WorldPosition) -> bool {
        self.player_position = position;
        if self.pass.is_some() || self.streamed_anchor == Some(self.player_anchor()) {
            return false;
        }
        self.start_load_area_around_player(StreamingRequest::background())
            .is_ok()
    }

    /// Place the player at a warp point, entering its scene.
    pub fn move_player_to(&mut self, warp: &WarpPoint) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.player_position = warp.position;
        self.set_current_scene(warp.scene.clone())
    }

    /// Hide every panel and the player, and load the intro scene.
    pub fn start_new_game(&mut self) {
        self.disable_all_panels();
        if let Some(player) = self.registry.player_renderer_mut() {
            player.set_visibility(false);
        }
        info!(scene = %self.config.intro_scene, "new_game_started");
        self.scenes.load_scene(&self.config.intro_scene);
    }

    /// Hide every panel and resume at a saved warp point.
    pub fn continue_file(&mut self, saved: &WarpPoint) -> Result<(), CoreError> {
        self.disable_all_panels();
        self.move_player_to(saved)
    }

    // World queries

    pub fn registry(&self) -> &ChunkRegistry {
        &self.registry
    }

    pub fn roster(&self) -> &CharacterRoster {
        &self.roster
    }

    pub fn find_character_instance(&self, name: &str) -> Option<&CharacterInstance> {
        self.roster.find_instance(name)
    }

    /// Tiles under a world position, across every active renderer.
    pub fn tile_instances_at(&self, position: WorldPosition) -> Vec<&TileInstance> {
        let (x, y) = position.tile();
        self.registry.tile_instances_at(x, y)
    }

    /// Terrain tiles under a world position at one elevation.
    pub fn tile_instances_at_elevation(&self, position: WorldPosition, elevation: i32) -> Vec<&TileInstance> {
        let (x, y) = position.tile();
        self.registry.tile_instances_at_elevation(x, y, elevation)
    }

    // UI

    pub fn ui(&self) -> &UiPanels {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiPanels {
        &mut self.ui
    }

    pub fn disable_all_panels(&mut self) {
        self.ui.disable_all();
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}
