/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::signer::ApiParams;
use crate::rest::{Client, Creds, Transport};
use bytes::Bytes;
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

/// Replays canned bodies in order and records every parameter set it was asked to send
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<ApiParams>>,
}

impl ScriptedTransport {
    pub(crate) fn new<I, S>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn empty() -> Arc<Self> {
        Self::new(Vec::<String>::new())
    }

    pub(crate) fn calls(&self) -> Vec<ApiParams> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn perform<'a>(&'a self, params: &'a ApiParams) -> BoxFuture<'a, Result<Bytes, FlickrError>> {
        self.calls.lock().unwrap().push(params.clone());
        let next = self.responses.lock().unwrap().pop_front();
        Box::pin(async move {
            next.map(Bytes::from)
                .ok_or_else(|| io::Error::other("no scripted response left").into())
        })
    }
}

pub(crate) fn client(transport: Arc<ScriptedTransport>) -> Client {
    Client::with_transport(Creds::new("key", "secret"), transport)
}
