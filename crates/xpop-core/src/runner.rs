// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! [`Runner`]: the modal popup entry point

use crate::backend::Backend;
use crate::config::{self, Config, Options};
use crate::event::Timers;
use crate::popup::{Error, Interaction, PopupId, PopupReturn, Popups, Result, State};
use crate::util::{warn_about_error, warn_about_error_with_target};

/// Owner of a popup registry and the backend it is shown on
///
/// Build popups through [`Self::popups_mut`], then show one with
/// [`Self::do_popup`]:
///
/// ```
/// use xpop_core::backend::headless::{Headless, Script};
/// use xpop_core::event::Key;
/// use xpop_core::geom::Size;
/// use xpop_core::Runner;
///
/// let mut runner = Runner::new(Headless::new(Size(640, 480)));
/// let p = runner.popups_mut().create(None, Some("Edit"));
/// runner.popups_mut().add_entries(p, "Cut|Copy|Paste", &[]).unwrap();
///
/// runner
///     .backend_mut()
///     .push_script(Script::new().key(Key::Down).key(Key::Down).key(Key::Return));
/// let ret = runner.do_popup(p).unwrap();
/// assert_eq!(ret.label, "Copy");
/// ```
pub struct Runner<B: Backend> {
    options: Options,
    config: Config,
    backend: B,
    popups: Popups,
    timers: Timers,
    state: State,
}

impl<B: Backend> Runner<B> {
    /// Construct, with options from [`Options::from_env`]
    ///
    /// Config is provided by [`Options::read_config`]; on failure a warning
    /// is logged and the default config is used.
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, Options::from_env())
    }

    /// Construct with the given options
    pub fn with_options(backend: B, options: Options) -> Self {
        let config = match options.read_config() {
            Ok(config) => config,
            Err(error) => {
                warn_about_error("xpop::Runner: failed to read config", &error);
                Config::default()
            }
        };
        let mut runner = Self::with_config(backend, config);
        runner.options = options;
        runner
    }

    /// Construct with the given config (which is never written)
    pub fn with_config(backend: B, config: Config) -> Self {
        let popups = Popups::with_metrics(config.popup.clone(), backend.text_metrics());
        Runner {
            options: Options::default(),
            config,
            backend,
            popups,
            timers: Timers::new(),
            state: State::Idle,
        }
    }

    /// Construct, failing if the config cannot be read
    pub fn from_env(backend: B) -> Result<Self, config::Error> {
        let options = Options::from_env();
        let config = options.read_config()?;
        let mut runner = Self::with_config(backend, config);
        runner.options = options;
        Ok(runner)
    }

    #[inline]
    pub fn popups(&self) -> &Popups {
        &self.popups
    }

    #[inline]
    pub fn popups_mut(&mut self) -> &mut Popups {
        &mut self.popups
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Update the config
    ///
    /// Popup defaults apply to popups created after this call.
    pub fn update_config(&mut self, f: impl FnOnce(&mut Config)) {
        f(&mut self.config);
        *self.popups.defaults_mut() = self.config.popup.clone();
    }

    /// Save the config, if the options ask for that
    pub fn write_config(&self) -> Result<(), config::Error> {
        self.options.write_config(&self.config)
    }

    /// Timeouts serviced while a popup is shown
    #[inline]
    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    /// State of the last (or current) interaction
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Show `popup` and block until the interaction ends
    ///
    /// On selection, check marks are updated and callbacks run (see
    /// [`Response`](crate::popup::Response)). Returns `Ok(None)` when the
    /// popup was cancelled or a callback ignored the selection.
    pub fn run_modal(&mut self, popup: PopupId) -> Result<Option<PopupReturn>> {
        let p = self.popups.popup(popup)?;
        if p.parent().is_some() {
            log::error!(target: "xpop_core::popup", "run_modal: {popup} is a sub-popup");
            return Err(Error::IsSubPopup);
        }
        if p.is_shown() {
            log::error!(target: "xpop_core::popup", "run_modal: {popup} is already shown");
            return Err(Error::PopupShown);
        }

        let mut interaction = Interaction::new(
            &mut self.popups,
            &mut self.backend,
            &self.config.event,
            &mut self.timers,
        );
        let result = interaction.run(popup);
        self.state = interaction.state();

        match result? {
            Some(entry) => self.popups.dispatch(entry),
            None => Ok(None),
        }
    }

    /// Show `popup` and block until the interaction ends
    ///
    /// This is [`Self::run_modal`], with errors logged and mapped to `None`.
    pub fn do_popup(&mut self, popup: PopupId) -> Option<PopupReturn> {
        match self.run_modal(popup) {
            Ok(ret) => ret,
            Err(error) => {
                warn_about_error_with_target("xpop_core::popup", "do_popup failed", &error);
                None
            }
        }
    }
}
