//! # Music
//! Shuffle play for the music menu: keep a random track playing, skip on request, stop on the way
//! out. The speaker relay is switched on entry and off on exit.

use crate::error::AudioError;
use crate::gateway::{AudioPlayer, PinGateway, PinId, Source, Track};
use crate::relays::Relays;

/// Shuffle player state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MusicPlayer {
    /// Track currently loaded, `None` until the first one is
    track: Option<Track>,
}

impl MusicPlayer {
    /// A player that has loaded nothing
    #[must_use]
    pub const fn new() -> Self {
        Self { track: None }
    }

    /// Track currently loaded
    #[must_use]
    pub const fn track(&self) -> Option<Track> {
        self.track
    }

    /// Switch the speaker on. Playback starts with the next [`poll`](Self::poll).
    pub async fn enter<P: PinGateway>(&mut self, relays: &mut Relays<P>, speaker: PinId) {
        info!("music on");
        self.track = None;
        relays.on(speaker).await;
    }

    /// Start a new random track when nothing is playing.
    /// Returns the track when one was started, `None` while the current one still plays.
    pub async fn poll<A: AudioPlayer>(&mut self, audio: &mut A) -> Result<Option<Track>, AudioError> {
        match audio.is_playing().await {
            Ok(true) => Ok(None),
            Ok(false) => self.next(audio).await.map(Some),
            Err(e) => {
                warn!("player state unknown: {}", e);
                Ok(None)
            }
        }
    }

    /// Stop the current track and start another random one
    pub async fn skip<A: AudioPlayer>(&mut self, audio: &mut A) -> Result<Track, AudioError> {
        if let Err(e) = audio.stop().await {
            warn!("stop failed: {}", e);
        }
        self.next(audio).await
    }

    /// Stop playback and switch the speaker off
    pub async fn leave<P: PinGateway, A: AudioPlayer>(
        &mut self,
        relays: &mut Relays<P>,
        audio: &mut A,
        speaker: PinId,
    ) {
        info!("music off");
        relays.off(speaker).await;
        if let Err(e) = audio.stop().await {
            warn!("stop failed: {}", e);
        }
        self.track = None;
    }

    /// Load and play a random track
    async fn next<A: AudioPlayer>(&mut self, audio: &mut A) -> Result<Track, AudioError> {
        let track = audio.load(Source::Random).await?;
        audio.play().await?;
        debug!("playing track {}", track.0);
        self.track = Some(track);
        Ok(track)
    }
}
