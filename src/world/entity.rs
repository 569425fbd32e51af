//! Billboard entities and their sprite renderers.
//!
//! A sprite renderer is either a single image or an [`Animator`] stepping
//! through frame lists.  Both expose the same two capabilities: turn a
//! per-frame [`Projection`] into a draw, and describe themselves for a
//! debug overlay.

use crate::{
    engine::Projection,
    math::Vec2,
    renderer::{DrawCall, SpriteQuad},
    world::texture::TextureId,
};

/// One named frame list.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub name: String,
    pub frames: Vec<TextureId>,
    /// seconds each frame stays on screen
    pub frame_time: f64,
}

/// Frame stepper over a set of animations.
#[derive(Clone, Debug)]
pub struct Animator {
    animations: Vec<Animation>,
    current: usize,
    elapsed: f64,
    frame: usize,
}

impl Animator {
    /// Starts on animation 0, frame 0.
    pub fn new(animations: Vec<Animation>) -> Self {
        Self {
            animations,
            current: 0,
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Select animation `index` and restart it.  Unknown indices are ignored.
    pub fn switch_animation(&mut self, index: usize) {
        if index < self.animations.len() {
            self.current = index;
            self.elapsed = 0.0;
            self.frame = 0;
        }
    }

    pub fn current_animation(&self) -> Option<&Animation> {
        self.animations.get(self.current)
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.frame
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Texture of the frame on screen right now.
    pub fn texture(&self) -> Option<TextureId> {
        self.current_animation()
            .and_then(|a| a.frames.get(self.frame))
            .copied()
    }

    /// Advance the clock by `dt` seconds, flipping to the next frame (and
    /// back to 0 after the last) once `frame_time` has passed.
    pub fn advance(&mut self, dt: f64) {
        let Some(anim) = self.animations.get(self.current) else {
            return;
        };
        if anim.frames.is_empty() {
            return;
        }
        self.elapsed += dt;
        if self.elapsed < anim.frame_time {
            return;
        }
        self.elapsed = 0.0;
        self.frame = (self.frame + 1) % anim.frames.len();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StaticSprite {
    pub texture: TextureId,
}

#[derive(Clone, Debug)]
pub struct AnimatedSprite {
    pub animator: Animator,
}

#[derive(Clone, Debug)]
pub enum SpriteKind {
    Static(StaticSprite),
    Animated(AnimatedSprite),
}

/// How an entity looks on screen.
#[derive(Clone, Debug)]
pub struct SpriteRenderer {
    pub kind: SpriteKind,
    /// on-screen size in pixels at a distance of one map-cell resolution
    pub size: Vec2,
    /// pixels the sprite is lifted above its projected position
    pub y_offset: i32,
}

impl SpriteRenderer {
    pub fn still(texture: TextureId, size: Vec2, y_offset: i32) -> Self {
        Self {
            kind: SpriteKind::Static(StaticSprite { texture }),
            size,
            y_offset,
        }
    }

    pub fn animated(animator: Animator, size: Vec2, y_offset: i32) -> Self {
        Self {
            kind: SpriteKind::Animated(AnimatedSprite { animator }),
            size,
            y_offset,
        }
    }

    pub fn texture(&self) -> Option<TextureId> {
        match &self.kind {
            SpriteKind::Static(s) => Some(s.texture),
            SpriteKind::Animated(a) => a.animator.texture(),
        }
    }

    /// Per-update bookkeeping; static sprites have none.
    pub fn advance(&mut self, dt: f64) {
        if let SpriteKind::Animated(a) = &mut self.kind {
            a.animator.advance(dt);
        }
    }

    /// Screen rectangle for a visible projection, `None` otherwise.
    pub fn quad(&self, p: &Projection) -> Option<SpriteQuad> {
        if !p.visible {
            return None;
        }
        Some(SpriteQuad {
            texture: self.texture()?,
            x: p.screen_pos.x as i32,
            y: p.screen_pos.y as i32 - self.y_offset,
            w: p.screen_size.x as i32,
            h: p.screen_size.y as i32,
            depth: p.distance,
        })
    }

    /// Queue this sprite for the frame being built.
    pub fn render(&self, p: &Projection, queue: &mut Vec<DrawCall>) {
        if let Some(q) = self.quad(p) {
            queue.push(DrawCall::Sprite(q));
        }
    }

    pub fn debug_info(&self, p: &Projection) -> Vec<String> {
        let mut out = vec![
            match self.kind {
                SpriteKind::Static(_) => "Sprite Renderer: STATIC".to_string(),
                SpriteKind::Animated(_) => "Sprite Renderer: ANIMATED".to_string(),
            },
            format!("ScreenPos: ({:.1},{:.1})", p.screen_pos.x, p.screen_pos.y),
            format!("ScreenSize: ({:.1},{:.1})", p.screen_size.x, p.screen_size.y),
            format!("OnScreen: {}", p.visible),
        ];
        if let SpriteKind::Animated(a) = &self.kind {
            let name = a
                .animator
                .current_animation()
                .map_or("-", |anim| anim.name.as_str());
            out.push("- Animation -".into());
            out.push(format!("CurrentAnimation: {name}"));
            out.push(format!("ElapsedTime: {:.3}", a.animator.elapsed()));
            out.push(format!("CurrentFrame: {}", a.animator.current_frame()));
        }
        out
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub name: String,
    pub position: Vec2,
    pub sprite: SpriteRenderer,
}

impl Entity {
    pub fn new(name: impl Into<String>, position: Vec2, sprite: SpriteRenderer) -> Self {
        Self {
            name: name.into(),
            position,
            sprite,
        }
    }

    /// Position line followed by the sprite's own lines.
    pub fn debug_info(&self, p: &Projection) -> Vec<String> {
        let mut out = vec![format!("({},{})", self.position.x, self.position.y)];
        out.extend(self.sprite.debug_info(p));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> Animation {
        Animation {
            name: "walk".into(),
            frames: vec![10, 11, 12],
            frame_time: 0.25,
        }
    }

    fn visible_at(x: f64, y: f64) -> Projection {
        Projection {
            screen_pos: Vec2::new(x, y),
            screen_size: Vec2::new(20.0, 40.0),
            distance: 3.0,
            visible: true,
        }
    }

    #[test]
    fn animator_steps_and_wraps() {
        let mut a = Animator::new(vec![walk()]);
        assert_eq!(a.texture(), Some(10));
        a.advance(0.1);
        assert_eq!(a.current_frame(), 0);
        a.advance(0.2);
        assert_eq!(a.texture(), Some(11));
        a.advance(0.3);
        a.advance(0.3);
        assert_eq!(a.texture(), Some(10), "wraps after the last frame");
    }

    #[test]
    fn switching_resets_timers() {
        let idle = Animation {
            name: "idle".into(),
            frames: vec![1],
            frame_time: 1.0,
        };
        let mut a = Animator::new(vec![walk(), idle]);
        a.advance(0.3);
        a.advance(0.1);
        a.switch_animation(1);
        assert_eq!(a.current_frame(), 0);
        assert_eq!(a.elapsed(), 0.0);
        assert_eq!(a.texture(), Some(1));
        a.switch_animation(7);
        assert_eq!(a.current_animation().unwrap().name, "idle");
    }

    #[test]
    fn empty_animator_is_inert() {
        let mut a = Animator::new(Vec::new());
        a.advance(5.0);
        assert_eq!(a.texture(), None);
    }

    #[test]
    fn quad_applies_y_offset() {
        let s = SpriteRenderer::still(4, Vec2::new(20.0, 40.0), 6);
        let q = s.quad(&visible_at(100.0, 50.0)).unwrap();
        assert_eq!((q.x, q.y, q.w, q.h), (100, 44, 20, 40));
        assert_eq!(q.texture, 4);
        assert_eq!(q.depth, 3.0);
    }

    #[test]
    fn hidden_projection_is_not_queued() {
        let s = SpriteRenderer::still(4, Vec2::ONE, 0);
        let mut p = visible_at(1.0, 1.0);
        p.visible = false;
        let mut queue = Vec::new();
        s.render(&p, &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn debug_info_names_the_renderer() {
        let e = Entity::new(
            "lamp",
            Vec2::new(2.5, 3.0),
            SpriteRenderer::animated(Animator::new(vec![walk()]), Vec2::ONE, 0),
        );
        let info = e.debug_info(&visible_at(0.0, 0.0));
        assert_eq!(info[0], "(2.5,3)");
        assert_eq!(info[1], "Sprite Renderer: ANIMATED");
        assert!(info.contains(&"CurrentAnimation: walk".to_string()));
    }
}
