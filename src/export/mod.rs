pub mod escape;
mod templates;

use serde::Serialize;

use crate::model::ExtractionResult;

/// Export targets. Keys are what the CLI accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameworkKey {
    Next,
    Remix,
    Astro,
    ViteReact,
    #[value(name = "sveltekit")]
    #[serde(rename = "sveltekit")]
    SvelteKit,
    VueVite,
    Nuxt,
    Html,
}

impl FrameworkKey {
    pub const ALL: [FrameworkKey; 8] = [
        FrameworkKey::Next,
        FrameworkKey::Remix,
        FrameworkKey::Astro,
        FrameworkKey::ViteReact,
        FrameworkKey::SvelteKit,
        FrameworkKey::VueVite,
        FrameworkKey::Nuxt,
        FrameworkKey::Html,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FrameworkKey::Next => "next",
            FrameworkKey::Remix => "remix",
            FrameworkKey::Astro => "astro",
            FrameworkKey::ViteReact => "vite-react",
            FrameworkKey::SvelteKit => "sveltekit",
            FrameworkKey::VueVite => "vue-vite",
            FrameworkKey::Nuxt => "nuxt",
            FrameworkKey::Html => "html",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrameworkKey::Next => "Next.js (App Router, TSX)",
            FrameworkKey::Remix => "Remix (TSX)",
            FrameworkKey::Astro => "Astro (.astro)",
            FrameworkKey::ViteReact => "Vite (React, JSX)",
            FrameworkKey::SvelteKit => "SvelteKit (+page.svelte)",
            FrameworkKey::VueVite => "Vue (Vite, SFC)",
            FrameworkKey::Nuxt => "Nuxt (pages/preview.vue)",
            FrameworkKey::Html => "HTML + CSS + JS (combined)",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            FrameworkKey::Next => "page.tsx",
            FrameworkKey::Remix => "preview.tsx",
            FrameworkKey::Astro => "preview.astro",
            FrameworkKey::ViteReact => "Preview.jsx",
            FrameworkKey::SvelteKit => "+page.svelte",
            FrameworkKey::VueVite => "Preview.vue",
            FrameworkKey::Nuxt => "preview.vue",
            FrameworkKey::Html => "index.html",
        }
    }
}

impl std::fmt::Display for FrameworkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub filename: String,
    pub code: String,
}

/// Single source file recreating the captured page in `framework`. Pure and total.
pub fn generate(result: &ExtractionResult, framework: FrameworkKey) -> ExportArtifact {
    let code = match framework {
        FrameworkKey::Next => templates::react(result, templates::ReactFlavor::Next),
        FrameworkKey::Remix => templates::react(result, templates::ReactFlavor::Remix),
        FrameworkKey::ViteReact => templates::react(result, templates::ReactFlavor::Vite),
        FrameworkKey::Astro => templates::astro(result),
        FrameworkKey::SvelteKit => templates::svelte(result),
        FrameworkKey::VueVite | FrameworkKey::Nuxt => templates::vue(result),
        FrameworkKey::Html => templates::html(result),
    };
    ExportArtifact {
        filename: framework.filename().to_string(),
        code,
    }
}
