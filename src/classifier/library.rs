use serde::Serialize;

/// Animation libraries the classifier can recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Library {
    #[serde(rename = "GSAP")]
    Gsap,
    #[serde(rename = "Three.js")]
    ThreeJs,
    #[serde(rename = "Lottie")]
    Lottie,
    #[serde(rename = "AOS")]
    Aos,
    #[serde(rename = "Anime.js")]
    AnimeJs,
    #[serde(rename = "Locomotive Scroll")]
    LocomotiveScroll,
    #[serde(rename = "Framer Motion")]
    FramerMotion,
    #[serde(rename = "Barba.js")]
    BarbaJs,
    #[serde(rename = "ScrollMagic")]
    ScrollMagic,
    #[serde(rename = "Velocity.js")]
    VelocityJs,
    #[serde(rename = "Swiper")]
    Swiper,
    #[serde(rename = "Particles")]
    Particles,
}

impl Library {
    /// Catalog order; earlier entries win confidence ties.
    pub const ALL: [Library; 12] = [
        Library::Gsap,
        Library::ThreeJs,
        Library::Lottie,
        Library::Aos,
        Library::AnimeJs,
        Library::LocomotiveScroll,
        Library::FramerMotion,
        Library::BarbaJs,
        Library::ScrollMagic,
        Library::VelocityJs,
        Library::Swiper,
        Library::Particles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Library::Gsap => "GSAP",
            Library::ThreeJs => "Three.js",
            Library::Lottie => "Lottie",
            Library::Aos => "AOS",
            Library::AnimeJs => "Anime.js",
            Library::LocomotiveScroll => "Locomotive Scroll",
            Library::FramerMotion => "Framer Motion",
            Library::BarbaJs => "Barba.js",
            Library::ScrollMagic => "ScrollMagic",
            Library::VelocityJs => "Velocity.js",
            Library::Swiper => "Swiper",
            Library::Particles => "Particles",
        }
    }

    /// Weighted signature patterns, matched case-insensitively.
    /// Exact API calls weigh more than bare mentions of the name.
    pub fn patterns(self) -> &'static [(&'static str, u32)] {
        match self {
            Library::Gsap => &[
                (r"gsap\.registerPlugin|gsap\.timeline|gsap\.to|gsap\.from", 95),
                (r"greensock|tweenmax|tweenlite|timelinemax", 90),
                (r"scrolltrigger|motionpath|drawsvg", 85),
                (r"gsap", 70),
            ],
            Library::ThreeJs => &[
                (r"new THREE\.|THREE\.Scene|THREE\.WebGLRenderer", 95),
                (r"PerspectiveCamera|BufferGeometry|MeshBasicMaterial", 90),
                (r"three\.js|three\.min\.js", 85),
                (r"webgl|canvas.*3d", 60),
            ],
            Library::Lottie => &[
                (r"lottie\.loadAnimation|bodymovin", 95),
                (r"lottie-web|lottie\.js", 85),
                (r"lottie", 70),
            ],
            Library::Aos => &[(r"AOS\.init|data-aos", 95), (r"aos\.js", 85)],
            Library::AnimeJs => &[(r"anime\(\{|anime\.timeline", 95), (r"anime\.js", 85)],
            Library::LocomotiveScroll => &[
                (r"new LocomotiveScroll|data-scroll", 95),
                (r"locomotive-scroll", 85),
            ],
            Library::FramerMotion => &[(
                r"framer-motion|motion\.|useAnimation|AnimatePresence",
                95,
            )],
            Library::BarbaJs => &[
                (r"barba\.init|barba\.hooks", 95),
                (r"@barba/core|barba\.js|barba\.min\.js", 85),
                (r"data-barba", 80),
            ],
            Library::ScrollMagic => &[
                (r"new ScrollMagic\.Controller|new ScrollMagic\.Scene", 95),
                (r"scrollmagic\.min\.js|animation\.gsap", 85),
                (r"scrollmagic", 70),
            ],
            Library::VelocityJs => &[
                (r"\.velocity\(|Velocity\.animate|Velocity\(", 95),
                (r"velocity\.js|velocity\.min\.js", 85),
            ],
            Library::Swiper => &[
                (r"new Swiper\(", 95),
                (r"swiper-bundle|swiper\.min\.js", 85),
                (r"swiper-wrapper|swiper-slide", 80),
            ],
            Library::Particles => &[
                (r"particlesJS\(|tsParticles\.load", 95),
                (r"particles\.js|particles\.min\.js|tsparticles", 85),
                (r"particles-js", 75),
            ],
        }
    }

    /// Resources a regenerated page needs to load for this library to work.
    pub fn cdn_urls(self) -> &'static [&'static str] {
        match self {
            Library::Gsap => &[
                "https://cdnjs.cloudflare.com/ajax/libs/gsap/3.12.2/gsap.min.js",
                "https://cdnjs.cloudflare.com/ajax/libs/gsap/3.12.2/ScrollTrigger.min.js",
                "https://cdnjs.cloudflare.com/ajax/libs/gsap/3.12.2/TextPlugin.min.js",
                "https://cdnjs.cloudflare.com/ajax/libs/gsap/3.12.2/MotionPathPlugin.min.js",
            ],
            Library::ThreeJs => &[
                "https://cdnjs.cloudflare.com/ajax/libs/three.js/r128/three.min.js",
                "https://cdnjs.cloudflare.com/ajax/libs/dat-gui/0.7.9/dat.gui.min.js",
            ],
            Library::Lottie => {
                &["https://cdnjs.cloudflare.com/ajax/libs/lottie-web/5.12.2/lottie.min.js"]
            }
            Library::Aos => &[
                "https://cdnjs.cloudflare.com/ajax/libs/aos/2.3.4/aos.js",
                "https://cdnjs.cloudflare.com/ajax/libs/aos/2.3.4/aos.css",
            ],
            Library::AnimeJs => {
                &["https://cdnjs.cloudflare.com/ajax/libs/animejs/3.2.1/anime.min.js"]
            }
            Library::LocomotiveScroll => &[
                "https://cdn.jsdelivr.net/npm/locomotive-scroll@4.1.4/dist/locomotive-scroll.min.js",
                "https://cdn.jsdelivr.net/npm/locomotive-scroll@4.1.4/dist/locomotive-scroll.min.css",
            ],
            // no standalone browser build
            Library::FramerMotion => &[],
            Library::BarbaJs => {
                &["https://cdnjs.cloudflare.com/ajax/libs/barba.js/1.0.0/barba.min.js"]
            }
            Library::ScrollMagic => &[
                "https://cdnjs.cloudflare.com/ajax/libs/ScrollMagic/2.0.8/ScrollMagic.min.js",
                "https://cdnjs.cloudflare.com/ajax/libs/ScrollMagic/2.0.8/plugins/animation.gsap.min.js",
            ],
            Library::VelocityJs => {
                &["https://cdnjs.cloudflare.com/ajax/libs/velocity/2.0.6/velocity.min.js"]
            }
            Library::Swiper => &[
                "https://cdn.jsdelivr.net/npm/swiper@8/swiper-bundle.min.js",
                "https://cdn.jsdelivr.net/npm/swiper@8/swiper-bundle.min.css",
            ],
            Library::Particles => {
                &["https://cdn.jsdelivr.net/npm/particles.js@2.0.0/particles.min.js"]
            }
        }
    }

    /// Coarse presence check used for technology guesses.
    pub fn tech_pattern(self) -> &'static str {
        match self {
            Library::Gsap => r"gsap|greensock|tweenmax",
            Library::ThreeJs => r"three\.js|three\.min\.js|THREE\.",
            Library::Lottie => r"lottie|bodymovin",
            Library::Aos => r"AOS\.init|data-aos",
            Library::AnimeJs => r"anime\.js|anime\(\{",
            Library::LocomotiveScroll => r"locomotive-scroll|LocomotiveScroll",
            Library::FramerMotion => r"framer-motion",
            Library::BarbaJs => r"barba",
            Library::ScrollMagic => r"scrollmagic",
            Library::VelocityJs => r"velocity\.js|velocity\.min\.js",
            Library::Swiper => r"swiper",
            Library::Particles => r"particles\.js|particlesJS|tsparticles",
        }
    }
}

impl std::fmt::Display for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
