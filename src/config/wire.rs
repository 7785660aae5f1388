//! Serde support: pages and the record set serialize as their wire bytes

use core::fmt;
use core::marker::PhantomData;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{ConfigPage1, ConfigPage2, ConfigPage3, ConfigRecordSet, IMAGE_LEN, PAGE_SIZE};
use crate::traits::ConfigPage;

struct WireVisitor<const N: usize, T> {
    name: &'static str,
    marker: PhantomData<T>,
}

impl<const N: usize, T> WireVisitor<N, T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            marker: PhantomData,
        }
    }
}

impl<'de, const N: usize, T> Visitor<'de> for WireVisitor<N, T> {
    type Value = [u8; N];

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} wire bytes ({} bytes)", self.name, N)
    }

    fn visit_bytes<E>(self, bytes: &[u8]) -> Result<[u8; N], E>
    where
        E: de::Error,
    {
        <[u8; N]>::try_from(bytes).map_err(|_| E::invalid_length(bytes.len(), &self))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<[u8; N], A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut out = [0u8; N];
        for (index, byte) in out.iter_mut().enumerate() {
            *byte = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(index, &self))?;
        }
        if seq.next_element::<u8>()?.is_some() {
            return Err(de::Error::invalid_length(N + 1, &self));
        }
        Ok(out)
    }
}

macro_rules! page_serde {
    ($page:ty, $name:literal) => {
        impl Serialize for $page {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }

        impl<'de> Deserialize<'de> for $page {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let bytes = deserializer
                    .deserialize_bytes(WireVisitor::<PAGE_SIZE, Self>::new($name))?;
                Ok(<$page>::from_bytes(&bytes))
            }
        }
    };
}

page_serde!(ConfigPage1, "ConfigPage1");
page_serde!(ConfigPage2, "ConfigPage2");
page_serde!(ConfigPage3, "ConfigPage3");

impl Serialize for ConfigRecordSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_image())
    }
}

impl<'de> Deserialize<'de> for ConfigRecordSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let image = deserializer
            .deserialize_bytes(WireVisitor::<IMAGE_LEN, Self>::new("ConfigRecordSet"))?;
        ConfigRecordSet::validate(&image).map_err(de::Error::custom)
    }
}
