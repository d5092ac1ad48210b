//! Frame-delay animations and the labelled animation set owned by a sprite.
//!
//! Timing is counted in update cycles, not seconds: with `frame_delay = 4`
//! a 60 cycles/s sketch shows 15 animation frames per second.

use std::collections::HashMap;

use crate::api::types::{FrameRect, ImageHandle};

/// Default number of cycles each frame stays on screen.
pub const DEFAULT_FRAME_DELAY: u32 = 4;

/// A single animation frame: an image, optionally a sub-rectangle of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub image: ImageHandle,
    pub rect: Option<FrameRect>,
}

impl Frame {
    pub fn image(image: ImageHandle) -> Self {
        Self { image, rect: None }
    }

    pub fn sub_image(image: ImageHandle, rect: FrameRect) -> Self {
        Self { image, rect: Some(rect) }
    }

    pub fn width(&self) -> f32 {
        self.rect.map_or(self.image.width, |r| r.width)
    }

    pub fn height(&self) -> f32 {
        self.rect.map_or(self.image.height, |r| r.height)
    }
}

/// An ordered sequence of frames with playback state.
///
/// Cloning produces an independent playback state over the same images,
/// which is how several sprites share one loaded animation.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<Frame>,
    frame: usize,
    /// Cycles per frame advance. Values below 1 behave as 1.
    pub frame_delay: u32,
    /// Wrap to the first frame after the last one instead of stopping.
    pub looping: bool,
    pub playing: bool,
    pub visible: bool,
    frame_changed: bool,
    countdown: u32,
    target_frame: Option<usize>,
}

impl Animation {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            frame: 0,
            frame_delay: DEFAULT_FRAME_DELAY,
            looping: true,
            playing: true,
            visible: true,
            frame_changed: false,
            countdown: DEFAULT_FRAME_DELAY,
            target_frame: None,
        }
    }

    /// One frame per image, in order.
    pub fn from_images(images: impl IntoIterator<Item = ImageHandle>) -> Self {
        Self::new(images.into_iter().map(Frame::image).collect())
    }

    /// A still image treated as a one-frame animation.
    pub fn single(image: ImageHandle) -> Self {
        Self::new(vec![Frame::image(image)])
    }

    pub fn with_frame_delay(mut self, frame_delay: u32) -> Self {
        self.frame_delay = frame_delay;
        self.countdown = frame_delay.max(1);
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Current frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn last_frame(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// True if the frame index changed during the last update.
    pub fn frame_changed(&self) -> bool {
        self.frame_changed
    }

    pub fn target_frame(&self) -> Option<usize> {
        self.target_frame
    }

    pub fn frame_image(&self) -> Option<&Frame> {
        self.frames.get(self.frame)
    }

    pub fn image_at(&self, frame: usize) -> Option<&Frame> {
        self.frames.get(frame)
    }

    /// Current frame width, or 1 when there is no image.
    pub fn width(&self) -> f32 {
        self.frame_image().map_or(1.0, Frame::width)
    }

    /// Current frame height, or 1 when there is no image.
    pub fn height(&self) -> f32 {
        self.frame_image().map_or(1.0, Frame::height)
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.target_frame = None;
    }

    /// Stop playback, holding the current frame.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn rewind(&mut self) {
        self.frame = 0;
        self.target_frame = None;
    }

    /// Jump to a frame. Out-of-range values clamp to the last frame.
    pub fn change_frame(&mut self, frame: usize) {
        self.frame = frame.min(self.last_frame());
        self.target_frame = None;
    }

    /// Step forward once and stop.
    pub fn next_frame(&mut self) {
        if self.frame < self.last_frame() {
            self.frame += 1;
        } else if self.looping {
            self.frame = 0;
        }
        self.target_frame = None;
        self.playing = false;
    }

    /// Step backward once and stop.
    pub fn previous_frame(&mut self) {
        if self.frame > 0 {
            self.frame -= 1;
        } else if self.looping {
            self.frame = self.last_frame();
        }
        self.target_frame = None;
        self.playing = false;
    }

    /// Play forward or backward toward `frame`, one step per eligible cycle.
    ///
    /// A non-looping animation stops on arrival. A looping one holds the
    /// frame for as long as the call is repeated each cycle, and resumes its
    /// normal cycle once the calls stop. Targeting the current frame drops
    /// any earlier target.
    pub fn go_to_frame(&mut self, frame: usize) {
        if self.frames.is_empty() {
            return;
        }
        let target = frame.min(self.last_frame());
        if target == self.frame {
            if self.looping {
                // Hold: the next eligible update arrives without moving.
                self.target_frame = Some(target);
            } else {
                self.target_frame = None;
                self.playing = false;
            }
            return;
        }
        self.target_frame = Some(target);
        self.playing = true;
    }

    /// Advance the frame timer by one cycle.
    pub fn update(&mut self) {
        self.frame_changed = false;

        if !self.playing || self.frames.len() < 2 {
            return;
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return;
        }
        self.countdown = self.frame_delay.max(1);

        let previous = self.frame;

        if let Some(target) = self.target_frame {
            if target > self.frame {
                self.frame += 1;
            } else if target < self.frame {
                self.frame -= 1;
            }
            if self.frame == target {
                self.target_frame = None;
                if !self.looping {
                    self.playing = false;
                }
            }
        } else if self.frame < self.last_frame() {
            self.frame += 1;
        } else if self.looping {
            self.frame = 0;
        } else {
            self.playing = false;
        }

        self.frame_changed = self.frame != previous;
    }
}

/// Labelled animations owned by a sprite, plus the label currently shown.
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    animations: HashMap<String, Animation>,
    current: Option<String>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an animation. The first one added becomes current.
    pub fn add(&mut self, label: impl Into<String>, animation: Animation) {
        let label = label.into();
        if self.current.is_none() {
            self.current = Some(label.clone());
        }
        self.animations.insert(label, animation);
    }

    /// Switch the displayed animation. Unknown labels keep the current one.
    /// Switching does not rewind: the animation resumes where it was left.
    pub fn change(&mut self, label: &str) -> bool {
        if !self.animations.contains_key(label) {
            log::warn!("no animation labelled {label:?}");
            return false;
        }
        if self.current.as_deref() != Some(label) {
            self.current = Some(label.to_string());
        }
        true
    }

    pub fn label(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Animation> {
        self.current.as_ref().and_then(|l| self.animations.get(l))
    }

    pub fn current_mut(&mut self) -> Option<&mut Animation> {
        let label = self.current.as_ref()?;
        self.animations.get_mut(label)
    }

    pub fn get(&self, label: &str) -> Option<&Animation> {
        self.animations.get(label)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}
