/*!
# Portfolio Site

A single-page personal portfolio served by a small Rust backend.

## Overview

The site is a landing page with hero, about, experience, projects and contact
sections. Every text section can be edited in place by the site owner. Edits
are persisted to a JSON content file through a tiny HTTP API. Visitors can
send a "wave" from the contact section, which is checked against a bot
challenge, rate limited, and delivered to the owner by email.

## Architecture

### Content Layer
- **content**: the content document, its partial form and field patches
- **store**: JSON file persistence with atomic replace, and the `ContentSource` seam
- **edit**: the editor session state machine (Anonymous, ReadOnly, Editing)
- **ratelimit**: in-memory sliding window limiter used by the wave endpoint

### Effects Layer
- **animation**: confetti, cursor glow, mouse trail, magnetic buttons, the
  custom cursor and the typewriter subtitle, each an independent per-frame simulation driven by a `FrameDriver`

### Web Layer (feature `web`)
- **app**: routing, handlers and shared state
- **config**: command line and environment configuration
- **client**: HTTP implementation of `ContentSource` used by the CLI editor
- **wave**: the contact request pipeline
- **verify**: Turnstile bot verification
- **mailer**: SMTP notification email

## REST API Endpoints

- `GET /api/content` - Current content document, defaults filled in
- `POST /api/content` - Replace the content document
- `POST /api/wave` - Send a wave to the site owner
- `GET /api/wave/config` - Public bot challenge site key
*/

pub mod animation;
pub mod content;
pub mod edit;
pub mod ratelimit;
pub mod store;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod client;
#[cfg(feature = "web")]
pub mod config;
#[cfg(feature = "web")]
pub mod mailer;
#[cfg(feature = "web")]
pub mod verify;
#[cfg(feature = "web")]
pub mod wave;

pub use content::*;
pub use edit::{EditError, EditMode, EditSession};
pub use ratelimit::RateLimiter;
pub use store::{ContentError, ContentSource, ContentStore, parse_document};
