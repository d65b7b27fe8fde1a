//! The resumable streaming pass.
//!
//! [`StreamingPass::advance`] performs one unit of work per call:
//! - the first call prepares the pass (scene teardown, diff, chunk lookup) and
//!   builds the first missing renderer
//! - each following call builds one more renderer
//! - the call after the last renderer finishes the pass (characters, progress
//!   teardown, control restore) and reports [`PassStatus::Complete`]

use std::collections::VecDeque;
use std::sync::Arc;

use overworld::{Chunk, ChunkKey, ChunkStore, WorldPosition};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{wanted_chunk_keys, ChunkRegistry, ChunkRenderer, StreamingRequest};
use crate::activity::ActivityScheduler;
use crate::collaborators::{CharacterDirectory, SceneLoader};
use crate::roster::CharacterRoster;
use crate::ui::ProgressPanel;

pub const LOADING_TITLE: &str = "Loading chunks...";
pub const LOADING_INITIAL_INFO: &str = "Initializing...";

/// Everything a pass reads or mutates, borrowed for one advance.
pub struct StreamingEnv<'a> {
    pub chunk_size: (i32, i32),
    pub store: &'a dyn ChunkStore,
    pub registry: &'a mut ChunkRegistry,
    pub scenes: &'a mut dyn SceneLoader,
    pub progress: &'a mut dyn ProgressPanel,
    pub characters: &'a dyn CharacterDirectory,
    pub roster: &'a mut CharacterRoster,
    pub scheduler: &'a mut ActivityScheduler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    InProgress,
    Complete,
}

/// What a pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub scene: String,
    pub destroyed: Vec<ChunkKey>,
    pub loaded: Vec<ChunkKey>,
    /// Wanted keys with no chunk data.
    pub skipped: Vec<ChunkKey>,
    pub characters_placed: usize,
}

enum Stage {
    Pending,
    Loading(VecDeque<(ChunkKey, Arc<Chunk>)>),
    Finished,
}

pub struct StreamingPass {
    focus: WorldPosition,
    request: StreamingRequest,
    stage: Stage,
    total: usize,
    progress: f32,
    summary: PassSummary,
}

impl StreamingPass {
    pub fn new(scene: impl Into<String>, focus: WorldPosition, request: StreamingRequest) -> Self {
        Self {
            focus,
            request,
            stage: Stage::Pending,
            total: 0,
            progress: 0.0,
            summary: PassSummary {
                scene: scene.into(),
                ..Default::default()
            },
        }
    }

    pub fn scene(&self) -> &str {
        &self.summary.scene
    }

    pub fn focus(&self) -> WorldPosition {
        self.focus
    }

    pub fn request(&self) -> StreamingRequest {
        self.request
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.stage, Stage::Finished)
    }

    /// Chunks resolved but not yet built.
    pub fn remaining(&self) -> usize {
        match &self.stage {
            Stage::Loading(queue) => queue.len(),
            _ => 0,
        }
    }

    pub fn summary(&self) -> &PassSummary {
        &self.summary
    }

    pub fn into_summary(self) -> PassSummary {
        self.summary
    }

    /// Do one unit of work.
    pub fn advance(&mut self, env: &mut StreamingEnv<'_>) -> PassStatus {
        if matches!(self.stage, Stage::Pending) {
            self.prepare(env);
        }

        let next = match &mut self.stage {
            Stage::Loading(queue) => queue.pop_front(),
            Stage::Pending => None,
            Stage::Finished => return PassStatus::Complete,
        };

        match next {
            Some((key, chunk)) => {
                self.build_renderer(key, chunk, env);
                PassStatus::InProgress
            }
            None => {
                self.finish(env);
                PassStatus::Complete
            }
        }
    }

    fn prepare(&mut self, env: &mut StreamingEnv<'_>) {
        let scene = self.summary.scene.clone();

        if self.request.change_scene {
            self.summary.destroyed = env.registry.destroy_all_except_player();
            env.roster.clear();
            env.scenes.load_scene(&scene);
            info!(scene = %scene, "scene_loaded");
        }

        if self.request.show_progress {
            env.scheduler.set_control_disabled(true);
            env.progress.show();
            env.progress.set_title(LOADING_TITLE);
            env.progress.set_info(LOADING_INITIAL_INFO);
            env.progress.set_progress(0.0);
        }

        let (width, height) = env.chunk_size;
        let mut wanted = wanted_chunk_keys(self.focus, width, height);
        let destroyed = env.registry.retain_wanted(&mut wanted);
        self.summary.destroyed.extend(destroyed);

        let mut queue = VecDeque::with_capacity(wanted.len());
        for key in wanted {
            match env.store.get_chunk(&scene, &key) {
                Some(chunk) => queue.push_back((key, chunk)),
                None => {
                    debug!(scene = %scene, chunk = %key, "chunk_skipped");
                    self.summary.skipped.push(key);
                }
            }
        }

        if self.request.show_progress {
            self.progress = 0.0;
            env.progress.set_progress(0.0);
        }

        self.total = queue.len();
        info!(
            scene = %scene,
            to_load = self.total,
            destroyed = self.summary.destroyed.len(),
            skipped = self.summary.skipped.len(),
            "streaming_pass_started"
        );
        self.stage = Stage::Loading(queue);
    }

    fn build_renderer(&mut self, key: ChunkKey, chunk: Arc<Chunk>, env: &mut StreamingEnv<'_>) {
        if self.request.show_progress {
            env.progress.set_info(&format!("Setting up Chunk {}...", key));
        }

        if let Some(replaced) = env.registry.register(ChunkRenderer::new(key.clone(), chunk)) {
            warn!(chunk = %replaced.key(), "chunk_renderer_replaced");
        }
        debug!(chunk = %key, "chunk_renderer_created");
        self.summary.loaded.push(key);

        if self.request.show_progress {
            self.progress += 1.0 / self.total as f32;
            env.progress.set_progress(self.progress);
        }
    }

    fn finish(&mut self, env: &mut StreamingEnv<'_>) {
        if self.request.change_scene {
            let scene = self.summary.scene.clone();
            for path in env.characters.character_files(&scene) {
                match env.characters.open(&path) {
                    Ok(character) => {
                        self.summary.characters_placed += env.roster.attempt_load(character, &scene);
                    }
                    Err(error) => {
                        warn!(path = %path.display(), error = %error, "character_load_failed");
                    }
                }
            }
        }

        if self.request.show_progress {
            self.progress = 0.0;
            env.progress.set_progress(0.0);
            env.progress.hide();
            env.scheduler.set_control_disabled(false);
        }

        self.stage = Stage::Finished;
        info!(
            scene = %self.summary.scene,
            loaded = self.summary.loaded.len(),
            characters = self.summary.characters_placed,
            "streaming_pass_finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MemoryCharacterDirectory, RecordingSceneLoader};
    use crate::streaming::PLAYER_RENDERER;
    use crate::ui::HeadlessProgress;
    use overworld::{Character, CharacterInstance, MemoryChunkStore};

    struct Fixture {
        store: MemoryChunkStore,
        registry: ChunkRegistry,
        scenes: RecordingSceneLoader,
        progress: HeadlessProgress,
        characters: MemoryCharacterDirectory,
        roster: CharacterRoster,
        scheduler: ActivityScheduler,
    }

    impl Fixture {
        fn new() -> Self {
            let mut registry = ChunkRegistry::new();
            registry.register(ChunkRenderer::for_player());
            Self {
                store: MemoryChunkStore::new(),
                registry,
                scenes: RecordingSceneLoader::default(),
                progress: HeadlessProgress::default(),
                characters: MemoryCharacterDirectory::new(),
                roster: CharacterRoster::new(),
                scheduler: ActivityScheduler::new(),
            }
        }

        fn with_chunks(mut self, scene: &str, origins: &[(i32, i32)]) -> Self {
            for (x, y) in origins {
                self.store.insert(scene, Chunk::new(ChunkKey::from_origin(*x, *y)));
            }
            self
        }

        /// Run a pass to completion, checking control after every unit.
        fn run(&mut self, pass: &mut StreamingPass) -> usize {
            let mut progress = self.progress.clone();
            let mut scenes = self.scenes.clone();
            let mut advances = 0;
            loop {
                let mut env = StreamingEnv {
                    chunk_size: (32, 32),
                    store: &self.store,
                    registry: &mut self.registry,
                    scenes: &mut scenes,
                    progress: &mut progress,
                    characters: &self.characters,
                    roster: &mut self.roster,
                    scheduler: &mut self.scheduler,
                };
                advances += 1;
                if pass.advance(&mut env) == PassStatus::Complete {
                    return advances;
                }
                if pass.request().show_progress {
                    assert!(!self.scheduler.control_enabled());
                }
                assert!(advances < 32, "pass never completed");
            }
        }
    }

    fn every_origin() -> Vec<(i32, i32)> {
        let mut origins = Vec::new();
        for x in [-32, 0, 32] {
            for y in [-32, 0, 32] {
                origins.push((x, y));
            }
        }
        origins
    }

    #[test]
    fn test_beach_scenario_skips_missing_chunk() {
        let origins: Vec<_> = every_origin().into_iter().filter(|o| *o != (32, 32)).collect();
        let mut fixture = Fixture::new().with_chunks("Beach", &origins);
        let mut pass = StreamingPass::new(
            "Beach",
            WorldPosition::new(0.0, 0.0),
            StreamingRequest::scene_entry(true),
        );

        let advances = fixture.run(&mut pass);

        assert_eq!(advances, 9);
        assert_eq!(pass.summary().loaded.len(), 8);
        assert_eq!(pass.summary().skipped, vec![ChunkKey::from_origin(32, 32)]);
        assert_eq!(fixture.registry.chunk_keys().len(), 8);
        assert!(!fixture.registry.contains("32,32"));
        assert_eq!(fixture.scenes.loaded(), vec!["Beach".to_string()]);
        assert!(fixture.scheduler.control_enabled());
    }

    #[test]
    fn test_one_renderer_per_advance() {
        let mut fixture = Fixture::new().with_chunks("Beach", &every_origin());
        let mut pass = StreamingPass::new("Beach", WorldPosition::new(5.0, 5.0), StreamingRequest::background());
        let mut scenes = fixture.scenes.clone();
        let mut progress = fixture.progress.clone();

        for expected in 1..=9 {
            let mut env = StreamingEnv {
                chunk_size: (32, 32),
                store: &fixture.store,
                registry: &mut fixture.registry,
                scenes: &mut scenes,
                progress: &mut progress,
                characters: &fixture.characters,
                roster: &mut fixture.roster,
                scheduler: &mut fixture.scheduler,
            };
            assert_eq!(pass.advance(&mut env), PassStatus::InProgress);
            assert_eq!(fixture.registry.chunk_keys().len(), expected);
            assert_eq!(pass.remaining(), 9 - expected);
        }
    }

    #[test]
    fn test_progress_steps_and_resets() {
        let mut fixture = Fixture::new().with_chunks("Beach", &[(0, 0), (32, 0), (0, -32), (-32, 32)]);
        let mut pass = StreamingPass::new(
            "Beach",
            WorldPosition::new(0.0, 0.0),
            StreamingRequest::scene_entry(false),
        );

        fixture.run(&mut pass);

        let state = fixture.progress.snapshot();
        // Two zero resets before loading, four increments, one final reset.
        assert_eq!(state.history.len(), 7);
        assert_eq!(&state.history[..2], &[0.0, 0.0]);
        for (step, value) in state.history[2..6].iter().enumerate() {
            let expected = (step + 1) as f32 * 0.25;
            assert!((value - expected).abs() < 1e-6, "step {} was {}", step, value);
        }
        assert_eq!(state.progress, 0.0);
        assert!(!state.visible);
        assert_eq!(state.times_shown, 1);
        assert_eq!(state.title, LOADING_TITLE);
        assert_eq!(state.info, "Setting up Chunk 32,0...");
    }

    #[test]
    fn test_diff_keeps_resident_and_destroys_stale() {
        let mut fixture = Fixture::new().with_chunks("Beach", &every_origin());
        fixture.store.insert("Beach", Chunk::new(ChunkKey::from_origin(64, 64)));
        fixture.store.insert("Beach", Chunk::new(ChunkKey::from_origin(-64, -64)));

        let mut first = StreamingPass::new("Beach", WorldPosition::new(0.0, 0.0), StreamingRequest::background());
        fixture.run(&mut first);

        let mut second = StreamingPass::new("Beach", WorldPosition::new(40.0, 40.0), StreamingRequest::background());
        fixture.run(&mut second);

        let summary = second.summary();
        // Moving one cell diagonally keeps the 2×2 overlap.
        assert_eq!(summary.destroyed.len(), 5);
        assert_eq!(summary.loaded, vec![ChunkKey::from_origin(64, 64)]);
        assert_eq!(summary.skipped.len(), 4);
        assert!(fixture.registry.contains("0,0"));
        assert!(fixture.registry.contains("32,32"));
        assert!(!fixture.registry.contains("-32,-32"));
        assert!(fixture.registry.contains(PLAYER_RENDERER));
    }

    #[test]
    fn test_scene_change_places_characters() {
        let mut fixture = Fixture::new().with_chunks("Temple", &[(0, 0)]);
        fixture.registry.register(ChunkRenderer::new(
            ChunkKey::from_origin(0, 0),
            Arc::new(Chunk::new(ChunkKey::from_origin(0, 0))),
        ));
        fixture.characters.insert(
            "Temple",
            Character::new("Pearl").with_instance(CharacterInstance::new("Temple", WorldPosition::new(2.0, 2.0))),
        );
        fixture.characters.insert(
            "Temple",
            Character::new("Lion").with_instance(CharacterInstance::new("Beach", WorldPosition::new(0.0, 0.0))),
        );

        let mut pass = StreamingPass::new(
            "Temple",
            WorldPosition::new(1.0, 1.0),
            StreamingRequest {
                change_scene: true,
                show_progress: false,
            },
        );
        fixture.run(&mut pass);

        // The resident 0,0 belonged to the previous scene, so it was rebuilt.
        assert!(pass.summary().destroyed.contains(&ChunkKey::from_origin(0, 0)));
        assert_eq!(pass.summary().loaded, vec![ChunkKey::from_origin(0, 0)]);
        assert_eq!(pass.summary().characters_placed, 1);
        assert!(fixture.roster.find_instance("Pearl").is_some());
        assert!(fixture.roster.find_instance("Lion").is_none());
        assert!(fixture.progress.snapshot().history.is_empty());
    }

    #[test]
    fn test_empty_world_completes_in_one_advance() {
        let mut fixture = Fixture::new();
        let mut pass = StreamingPass::new("Void", WorldPosition::new(0.0, 0.0), StreamingRequest::scene_entry(true));

        assert_eq!(fixture.run(&mut pass), 1);
        assert!(pass.is_complete());
        assert_eq!(pass.summary().skipped.len(), 9);
        assert!(fixture.scheduler.control_enabled());
        assert_eq!(fixture.progress.snapshot().progress, 0.0);
    }
}
