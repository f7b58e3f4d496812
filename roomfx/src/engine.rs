//! Audio-engine side of room effects.
//!
//! Every resolution pass ends in exactly one call on a [`RoomEffectsSink`]. The
//! [`CommandSink`] forwards those calls as [`RoomFxCommand`]s over a channel so the audio
//! thread can pick them up without sharing any state with the main thread.

use crate::error::{Result, RoomFxError};
use crate::regions::{ProbePayload, RegionId, RoomPayload};
use crossbeam_channel::{Receiver, Sender};

/// Receiver of the active region's parameters.
pub trait RoomEffectsSink {
    fn apply_room_parameters(&mut self, region: RegionId, payload: &RoomPayload);

    fn apply_reverb_probe_parameters(&mut self, region: RegionId, payload: &ProbePayload);

    fn disable_room_effects(&mut self);
}

/// Room-effects commands sent to the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomFxCommand {
    ApplyRoom(RegionId, RoomPayload),
    ApplyReverbProbe(RegionId, ProbePayload),
    DisableRoomEffects,
}

impl RoomFxCommand {
    /// Region whose parameters the command carries, if any.
    pub fn region(&self) -> Option<RegionId> {
        match self {
            Self::ApplyRoom(id, _) | Self::ApplyReverbProbe(id, _) => Some(*id),
            Self::DisableRoomEffects => None,
        }
    }
}

/// Sink forwarding every call to a channel.
#[derive(Debug, Clone)]
pub struct CommandSink {
    sender: Sender<RoomFxCommand>,
}

impl CommandSink {
    pub fn new(sender: Sender<RoomFxCommand>) -> Self {
        Self { sender }
    }

    /// Creates a sink and the receiving end for the audio thread.
    pub fn channel() -> (Self, Receiver<RoomFxCommand>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }

    fn send(&self, command: RoomFxCommand) {
        if let Err(e) = self.try_send(command) {
            log::warn!("{}", e);
        }
    }

    fn try_send(&self, command: RoomFxCommand) -> Result<()> {
        self.sender.send(command).map_err(|e| {
            RoomFxError::Engine(format!("Failed to send room effects command: {}", e))
        })
    }
}

impl RoomEffectsSink for CommandSink {
    fn apply_room_parameters(&mut self, region: RegionId, payload: &RoomPayload) {
        self.send(RoomFxCommand::ApplyRoom(region, *payload));
    }

    fn apply_reverb_probe_parameters(&mut self, region: RegionId, payload: &ProbePayload) {
        self.send(RoomFxCommand::ApplyReverbProbe(region, *payload));
    }

    fn disable_room_effects(&mut self) {
        self.send(RoomFxCommand::DisableRoomEffects);
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RoomEffectsSink for NullSink {
    fn apply_room_parameters(&mut self, _region: RegionId, _payload: &RoomPayload) {}

    fn apply_reverb_probe_parameters(&mut self, _region: RegionId, _payload: &ProbePayload) {}

    fn disable_room_effects(&mut self) {}
}
