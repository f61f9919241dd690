//! # Sound task
//! This module contains the task that drives the DFPlayer Mini module, and the link the tick loop
//! uses to talk to it.
//!
//! The player is powered through a mosfet on start-up and stays on. Tracks are numbered files on
//! the SD card. Whether a track is still playing is read from the player's BUSY line, which is low
//! while playing.
use console_clock::error::{AudioError, GatewayError};
use console_clock::exchange::{Sequence, Tagged};
use console_clock::gateway::{AudioPlayer, Source, Track};
use console_clock::volume::Volume;
use defmt::{Debug2Format, Format, debug, info, warn};
use dfplayer_async::{DfPlayer, Equalizer, PlayBackSource, TimeSource};
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::uart::BufferedUart;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Instant, Timer, with_timeout};
use rand::Rng;

/// How long the tick loop waits for the sound task to answer
const REPLY_TIMEOUT: Duration = Duration::from_millis(1500);
/// Highest volume step of the DFPlayer
const PLAYER_MAX_VOLUME: u16 = 30;

/// What the tick loop asks of the player
#[derive(Debug, Clone, Copy, Format)]
enum SoundRequest {
    /// Select a track
    Load(Source),
    /// Start the selected track
    Play,
    /// Stop playback
    Stop,
    /// Ask whether a track plays
    IsPlaying,
    /// Change the output level
    SetVolume(Volume),
}

/// The player's answer
#[derive(Debug, Clone, Copy, Format)]
enum SoundReply {
    /// Request carried out
    Done,
    /// This track is selected
    Loaded(Track),
    /// Whether a track plays
    Playing(bool),
    /// Request failed
    Failed(AudioError),
}

/// Requests on their way to the sound task
static SOUND_REQUESTS: Channel<CriticalSectionRawMutex, Tagged<SoundRequest>, 1> = Channel::new();
/// Latest answer of the sound task
static SOUND_REPLY: Signal<CriticalSectionRawMutex, Tagged<SoundReply>> = Signal::new();

/// Time source implementation for the DFPlayer driver
struct PlayerTimeSource;

impl TimeSource for PlayerTimeSource {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn is_elapsed(&self, since: Self::Instant, timeout_ms: u64) -> bool {
        Instant::now().duration_since(since) >= Duration::from_millis(timeout_ms)
    }
}

/// The tick loop's side of the sound module
#[derive(Default)]
pub struct SoundLink {
    /// Tickets of the requests
    sequence: Sequence,
}

impl SoundLink {
    /// Send `request` and wait for its answer. Answers to requests that timed out are dropped.
    async fn request(&mut self, request: SoundRequest) -> Result<SoundReply, GatewayError> {
        let ticket = self.sequence.issue();
        let exchange = async {
            SOUND_REQUESTS.send(Tagged::new(ticket, request)).await;
            loop {
                let reply = SOUND_REPLY.wait().await;
                let stale = reply.ticket;
                match reply.claim(ticket) {
                    Some(reply) => break reply,
                    None => debug!("Dropped the late answer to sound request {}", stale),
                }
            }
        };
        with_timeout(REPLY_TIMEOUT, exchange)
            .await
            .map_err(|_| GatewayError::Timeout)
    }

    /// Send a request that only reports success
    async fn command(&mut self, request: SoundRequest) -> Result<(), GatewayError> {
        match self.request(request).await? {
            SoundReply::Done => Ok(()),
            SoundReply::Failed(AudioError::Unavailable(e)) => Err(e),
            _ => Err(GatewayError::Fault),
        }
    }
}

impl AudioPlayer for SoundLink {
    async fn load(&mut self, source: Source) -> Result<Track, AudioError> {
        match self.request(SoundRequest::Load(source)).await? {
            SoundReply::Loaded(track) => Ok(track),
            SoundReply::Failed(e) => Err(e),
            _ => Err(AudioError::Unavailable(GatewayError::Fault)),
        }
    }

    async fn play(&mut self) -> Result<(), GatewayError> {
        self.command(SoundRequest::Play).await
    }

    async fn stop(&mut self) -> Result<(), GatewayError> {
        self.command(SoundRequest::Stop).await
    }

    async fn is_playing(&mut self) -> Result<bool, GatewayError> {
        match self.request(SoundRequest::IsPlaying).await? {
            SoundReply::Playing(playing) => Ok(playing),
            _ => Err(GatewayError::Fault),
        }
    }

    async fn set_volume(&mut self, volume: Volume) -> Result<(), GatewayError> {
        self.command(SoundRequest::SetVolume(volume)).await
    }
}

/// Scale a volume in percent to the player's steps
fn player_volume(volume: Volume) -> u8 {
    let steps = u16::from(volume.percent()) * PLAYER_MAX_VOLUME / u16::from(Volume::MAX);
    u8::try_from(steps).unwrap_or(u8::MAX)
}

/// Pick the track for `source` out of `count` files on the card
fn pick(source: Source, count: u16) -> Result<Track, AudioError> {
    match source {
        _ if count == 0 => Err(AudioError::FileMissing),
        Source::Track(track) if track.0 == 0 || track.0 > count => Err(AudioError::FileMissing),
        Source::Track(track) => Ok(track),
        Source::Random => Ok(Track(RoscRng.gen_range(1..=count))),
    }
}

#[embassy_executor::task]
pub async fn sound(mut uart: BufferedUart, mut pwr: Output<'static>, busy: Input<'static>) {
    info!("Sound task started");

    let feedback_enable = false; // fails to acknowledge when enabled
    let timeout = Duration::from_secs(1);
    let reset_duration_override = Some(Duration::from_millis(1000));

    info!("Powering on the dfplayer");
    pwr.set_high();
    Timer::after(Duration::from_secs(1)).await;

    let mut player = match DfPlayer::new(
        &mut uart,
        feedback_enable,
        timeout.as_millis(),
        PlayerTimeSource,
        Delay,
        reset_duration_override.map(|d| d.as_millis()),
    )
    .await
    {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("DfPlayer initialization failed: {:?}", Debug2Format(&e));
            None
        }
    };

    let mut count = 0;
    if let Some(dfp) = player.as_mut() {
        let _ = dfp.set_equalizer(Equalizer::Classic).await;
        Timer::after(Duration::from_millis(100)).await;
        let _ = dfp.set_playback_source(PlayBackSource::SDCard).await;
        Timer::after(Duration::from_millis(100)).await;
        count = match dfp.query_tracks_sd().await {
            Ok(count) => count,
            Err(e) => {
                warn!("Track count unknown: {:?}", Debug2Format(&e));
                0
            }
        };
        info!("{} tracks on the card", count);
    }

    let mut selected: Option<Track> = None;
    loop {
        let request = SOUND_REQUESTS.receive().await;
        let Some(dfp) = player.as_mut() else {
            SOUND_REPLY.signal(request.answer(SoundReply::Failed(AudioError::Unavailable(
                GatewayError::Fault,
            ))));
            continue;
        };

        let reply = match request.value {
            SoundRequest::Load(source) => match pick(source, count) {
                Ok(track) => {
                    selected = Some(track);
                    SoundReply::Loaded(track)
                }
                Err(e) => SoundReply::Failed(e),
            },
            SoundRequest::Play => match selected {
                Some(track) => match dfp.play(track.0).await {
                    Ok(()) => SoundReply::Done,
                    Err(e) => {
                        warn!("Play failed: {:?}", Debug2Format(&e));
                        SoundReply::Failed(AudioError::Unavailable(GatewayError::Fault))
                    }
                },
                // nothing loaded, nothing to play
                None => SoundReply::Done,
            },
            SoundRequest::Stop => match dfp.stop().await {
                Ok(()) => SoundReply::Done,
                Err(e) => {
                    warn!("Stop failed: {:?}", Debug2Format(&e));
                    SoundReply::Failed(AudioError::Unavailable(GatewayError::Fault))
                }
            },
            SoundRequest::IsPlaying => SoundReply::Playing(busy.is_low()),
            SoundRequest::SetVolume(volume) => match dfp.set_volume(player_volume(volume)).await {
                Ok(()) => SoundReply::Done,
                Err(e) => {
                    warn!("Volume failed: {:?}", Debug2Format(&e));
                    SoundReply::Failed(AudioError::Unavailable(GatewayError::Fault))
                }
            },
        };
        SOUND_REPLY.signal(request.answer(reply));
    }
}
