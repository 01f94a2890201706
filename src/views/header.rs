use anyhow::Result;

use crate::store::{read_token, KeyValueStore, DARK_MODE_KEY, TOKEN_KEY};

/// Page header state: theme preference and login status.
pub struct HeaderView<S: KeyValueStore> {
    store: S,
    dark_mode: bool,
    authenticated: bool,
}

impl<S: KeyValueStore> HeaderView<S> {
    pub fn mount(store: S) -> Result<Self> {
        let dark_mode = store.get(DARK_MODE_KEY)?.as_deref() == Some("true");
        let authenticated = read_token(&store).is_some();
        Ok(Self {
            store,
            dark_mode,
            authenticated,
        })
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.store
            .set(DARK_MODE_KEY, if enabled { "true" } else { "false" })?;
        self.dark_mode = enabled;
        Ok(())
    }

    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        self.set_dark_mode(!self.dark_mode)?;
        Ok(self.dark_mode)
    }

    /// Forget the session token.
    pub fn logout(&mut self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        self.authenticated = false;
        Ok(())
    }
}
