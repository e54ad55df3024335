use std::{
    collections::BTreeMap,
    mem,
    panic::{self, AssertUnwindSafe},
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use strand_shared::{ActorId, ConfigRef, InputSubmission, Rect, SceneDelta, Timestamp};

use super::SceneConfig;
use crate::{
    client::{ClientKey, ClientLiaison, OccupantStatus},
    config::ConfigResolver,
    error::SceneServerError,
    logic::PawnLogic,
    run_queue::{RunQueue, RunQueueReceiver},
    scene::{Scene, TickParticipant},
    time_manager::TimeManager,
};

/// What a call to [`SceneServer::tick`] did
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TickOutcome {
    /// The scene advanced to `timestamp`
    Ticked { timestamp: Timestamp },
    /// The scene has been empty too long and sleeps until a client arrives
    Suspended,
    /// The scene has not been started, or has been stopped
    Stopped,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum ServerState {
    Stopped,
    Running,
    Idle,
}

/// Drives a [`Scene`]: advances its clock, runs its tick participants and
/// streams every connected client its deltas.
pub struct SceneServer {
    config: SceneConfig,
    scene: Scene,
    participants: Vec<Box<dyn TickParticipant>>,
    run_queue: RunQueueReceiver,
    clients: BTreeMap<ClientKey, ClientLiaison>,
    next_client_key: u64,
    outgoing_deltas: Vec<(ClientKey, SceneDelta)>,
    time_manager: TimeManager,
    state: ServerState,
    empty_since: Option<Instant>,
}

impl SceneServer {
    /// Create a new SceneServer. It does not tick until [`SceneServer::start`]
    pub fn new(
        config: SceneConfig,
        resolver: Box<dyn ConfigResolver>,
    ) -> Result<Self, SceneServerError> {
        let scene = Scene::new(&config, resolver)?;
        let time_manager = TimeManager::new(
            config.tick_interval,
            config.buffer_delay_ticks,
            config.interval_smoothing,
            Instant::now(),
        );

        Ok(Self {
            config,
            scene,
            participants: Vec::new(),
            run_queue: RunQueueReceiver::new(),
            clients: BTreeMap::new(),
            next_client_key: 0,
            outgoing_deltas: Vec::new(),
            time_manager,
            state: ServerState::Stopped,
            empty_since: None,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// A handle other threads can use to queue work for the next tick
    pub fn run_queue(&self) -> RunQueue {
        self.run_queue.handle()
    }

    /// Number of deferred actions waiting for the next tick
    pub fn queued_actions(&self) -> usize {
        self.run_queue.len()
    }

    pub fn add_tick_participant<P: TickParticipant + 'static>(&mut self, participant: P) {
        self.scene.add_tick_participant(participant);
    }

    /// Number of participants run on the last tick
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    // Lifecycle

    pub fn is_running(&self) -> bool {
        self.state == ServerState::Running
    }

    pub fn is_suspended(&self) -> bool {
        self.state == ServerState::Idle
    }

    pub fn start(&mut self, now: Instant) {
        if self.state == ServerState::Running {
            return;
        }
        self.scene.activate();
        self.time_manager.reset(now);
        self.state = ServerState::Running;
        if self.clients.is_empty() {
            self.empty_since = Some(now);
        }
        info!("Scene started");
    }

    /// Shuts the scene down: every actor is destroyed and removed, clients
    /// are dropped and pending work is discarded.
    pub fn stop(&mut self, now: Instant) {
        if self.state == ServerState::Stopped {
            return;
        }
        self.scene.shutdown();
        self.participants.clear();
        self.clients.clear();
        self.outgoing_deltas.clear();
        drop(self.run_queue.drain());
        self.state = ServerState::Stopped;
        self.empty_since = Some(now);
        info!("Scene stopped at {}", self.scene.timestamp());
    }

    // Ticking

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        match self.state {
            ServerState::Stopped => return TickOutcome::Stopped,
            ServerState::Idle => return TickOutcome::Suspended,
            ServerState::Running => {}
        }
        if let Some(empty_since) = self.empty_since {
            if self.clients.is_empty()
                && now.saturating_duration_since(empty_since) >= self.config.idle_tick_period
            {
                self.state = ServerState::Idle;
                info!("Scene idle for {:?}, suspending ticks", self.config.idle_tick_period);
                return TickOutcome::Suspended;
            }
        }

        let started = Instant::now();
        let elapsed = self.time_manager.advance(now);
        self.scene.advance(elapsed, self.time_manager.actual_interval());
        let timestamp = self.scene.timestamp();

        let pending = self.scene.take_pending_participants();
        self.participants.extend(pending);

        self.run_deferred_actions();
        self.tick_participants(timestamp);
        self.post_deltas();
        self.scene.end_tick();

        self.time_manager.record_tick_duration(started.elapsed());
        TickOutcome::Ticked { timestamp }
    }

    fn run_deferred_actions(&mut self) {
        for action in self.run_queue.drain() {
            if panic::catch_unwind(AssertUnwindSafe(|| action(self))).is_err() {
                warn!("Deferred action panicked at {}", self.scene.timestamp());
            }
        }
    }

    fn tick_participants(&mut self, timestamp: Timestamp) {
        let mut participants = mem::take(&mut self.participants);
        let scene = &mut self.scene;
        participants.retain_mut(|participant| {
            match panic::catch_unwind(AssertUnwindSafe(|| participant.tick(scene, timestamp))) {
                Ok(keep) => keep,
                Err(_) => {
                    warn!("Tick participant panicked at {}, removing it", timestamp);
                    false
                }
            }
        });
        self.participants = participants;
    }

    fn post_deltas(&mut self) {
        let scene = &mut self.scene;
        for (key, client) in self.clients.iter_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| client.post_delta(scene))) {
                Ok(Some(delta)) => self.outgoing_deltas.push((*key, delta)),
                Ok(None) => {}
                Err(_) => warn!("Liaison for client {:?} panicked while posting a delta", key),
            }
        }
    }

    /// Takes the deltas produced by ticks since the last call, for the transport to send
    pub fn take_outgoing_deltas(&mut self) -> Vec<(ClientKey, SceneDelta)> {
        mem::take(&mut self.outgoing_deltas)
    }

    // Timing

    pub fn timestamp(&self) -> Timestamp {
        self.scene.timestamp()
    }

    pub fn previous_timestamp(&self) -> Timestamp {
        self.scene.previous_timestamp()
    }

    pub fn next_timestamp(&self) -> Timestamp {
        self.scene.next_timestamp()
    }

    /// The smoothed interval between recent ticks, in milliseconds
    pub fn actual_interval(&self) -> Timestamp {
        self.time_manager.actual_interval()
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.time_manager.ticks_per_second()
    }

    /// How far behind the scene clock clients should display, in milliseconds
    pub fn buffer_delay(&self) -> Timestamp {
        self.time_manager.buffer_delay()
    }

    pub fn last_tick_duration(&self) -> Duration {
        self.time_manager.last_tick_duration()
    }

    // Clients

    /// Adds a client. With a pawn config, a pawn is spawned at the entrance
    /// named by `portal` and the client controls it. Arriving wakes an idle
    /// scene.
    pub fn add_client(
        &mut self,
        pawn: Option<&ConfigRef>,
        portal: Option<&str>,
        now: Instant,
    ) -> ClientKey {
        let key = ClientKey::new(self.next_client_key);
        self.next_client_key += 1;

        let mut liaison = ClientLiaison::new(key, self.config.default_local_interest);
        if let Some(config) = pawn {
            let entrance = self.scene.entrance_transform(portal);
            let pawn = self
                .scene
                .spawn_actor(config, entrance.translation, entrance.rotation);
            liaison.set_pawn(pawn);
        }
        self.clients.insert(key, liaison);
        self.empty_since = None;

        if self.state == ServerState::Idle {
            self.time_manager.reset(now);
            self.state = ServerState::Running;
            info!("Client {:?} arrived, resuming ticks", key);
        } else {
            info!("Client {:?} arrived", key);
        }
        key
    }

    /// Removes a client, destroying the pawn it controlled
    pub fn remove_client(&mut self, key: &ClientKey, now: Instant) -> Option<ClientLiaison> {
        let Some(liaison) = self.clients.remove(key) else {
            warn!("Cannot remove client {:?}: not connected", key);
            return None;
        };
        if let Some(pawn) = liaison.pawn() {
            let timestamp = self.scene.next_timestamp();
            self.scene.destroy_actor(pawn, timestamp);
        }
        if self.clients.is_empty() {
            self.empty_since = Some(now);
        }
        info!("Client {:?} left", key);
        Some(liaison)
    }

    pub fn client(&self, key: &ClientKey) -> Option<&ClientLiaison> {
        self.clients.get(key)
    }

    pub fn client_keys(&self) -> Vec<ClientKey> {
        self.clients.keys().copied().collect()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn client_updated(
        &mut self,
        key: &ClientKey,
        status: OccupantStatus,
    ) -> Result<(), SceneServerError> {
        let timestamp = self.scene.timestamp();
        let liaison = self.liaison_mut(key)?;
        liaison.client_updated(status, timestamp);
        Ok(())
    }

    /// Points a client's interest at another pawn. Input is only honored while
    /// the target is the client's own pawn.
    pub fn set_target(&mut self, key: &ClientKey, target: ActorId) -> Result<(), SceneServerError> {
        let Some(logic) = self.scene.actor_logic(target) else {
            return Err(SceneServerError::UnknownActor { id: target });
        };
        if !logic.is_instance_of(PawnLogic::CLASS) {
            return Err(SceneServerError::NotAPawn { id: target });
        }
        self.liaison_mut(key)?.set_target(Some(target));
        Ok(())
    }

    pub fn set_local_interest(
        &mut self,
        key: &ClientKey,
        interest: Rect,
    ) -> Result<(), SceneServerError> {
        self.liaison_mut(key)?.set_local_interest(interest);
        Ok(())
    }

    /// Processes an input submission received at `now`. The client's ping is
    /// the scene clock at receipt minus the client's estimate of it.
    pub fn enqueue_input(&mut self, key: &ClientKey, submission: InputSubmission, now: Instant) {
        let timestamp = self.scene.timestamp();
        let received_at = timestamp + self.time_manager.millis_since_last_tick(now);
        let Some(liaison) = self.clients.get_mut(key) else {
            debug!("Dropping input from unknown client {:?}", key);
            return;
        };

        let InputSubmission {
            acknowledge,
            client_time_estimate,
            frames,
        } = submission;
        let ping = received_at - client_time_estimate;
        let admitted = liaison.enqueue_input(acknowledge, ping, frames, timestamp);
        if admitted.is_empty() {
            return;
        }
        if let Some(target) = liaison.target() {
            if !self.scene.enqueue_actor_input(target, admitted) {
                debug!("Client {:?} target {} is gone, input dropped", key, target);
            }
        }
    }

    /// Forwards a named request from the client's pawn to another actor's logic
    pub fn submit_actor_request(
        &mut self,
        key: &ClientKey,
        target: ActorId,
        name: &str,
    ) -> Result<bool, SceneServerError> {
        let Some(source) = self.liaison_mut(key)?.pawn() else {
            warn!("Client {:?} made request '{}' without a pawn", key, name);
            return Ok(false);
        };
        Ok(self.scene.request(target, source, name))
    }

    fn liaison_mut(&mut self, key: &ClientKey) -> Result<&mut ClientLiaison, SceneServerError> {
        self.clients
            .get_mut(key)
            .ok_or(SceneServerError::UnknownClient { key: *key })
    }
}
