//! Builder for shortcuts.vdf byte streams shaped like the ones Steam writes

#![allow(dead_code)]

const MAP: u8 = 0x00;
const STRING: u8 = 0x01;
const INT32: u8 = 0x02;
const MAP_END: u8 = 0x08;

/// One shortcut record to encode
#[derive(Debug, Clone, Default)]
pub struct Shortcut {
    pub appid: Option<u32>,
    pub name: String,
    pub exe: String,
    pub icon: Option<String>,
    /// Extra string fields written after the icon slot
    pub extra: Vec<(String, Vec<u8>)>,
    /// Extra int32 fields written after the string extras
    pub extra_ints: Vec<(String, u32)>,
    pub tags: Vec<String>,
}

impl Shortcut {
    pub fn new(name: &str, exe: &str) -> Self {
        Shortcut {
            name: name.to_string(),
            exe: exe.to_string(),
            ..Default::default()
        }
    }

    pub fn appid(mut self, appid: u32) -> Self {
        self.appid = Some(appid);
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn extra(mut self, key: &str, value: &[u8]) -> Self {
        self.extra.push((key.to_string(), value.to_vec()));
        self
    }

    pub fn extra_int(mut self, key: &str, value: u32) -> Self {
        self.extra_ints.push((key.to_string(), value));
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }
}

fn key(out: &mut Vec<u8>, tag: u8, name: &str) {
    out.push(tag);
    out.extend_from_slice(name.as_bytes());
    out.push(0);
}

fn string(out: &mut Vec<u8>, name: &str, value: &[u8]) {
    key(out, STRING, name);
    out.extend_from_slice(value);
    out.push(0);
}

fn int(out: &mut Vec<u8>, name: &str, value: u32) {
    key(out, INT32, name);
    out.extend_from_slice(&value.to_le_bytes());
}

/// Encode a full store
pub fn store(shortcuts: &[Shortcut]) -> Vec<u8> {
    let mut out = Vec::new();
    key(&mut out, MAP, "shortcuts");

    for (index, shortcut) in shortcuts.iter().enumerate() {
        key(&mut out, MAP, &index.to_string());
        if let Some(appid) = shortcut.appid {
            int(&mut out, "appid", appid);
        }
        string(&mut out, "AppName", shortcut.name.as_bytes());
        string(&mut out, "Exe", shortcut.exe.as_bytes());
        string(&mut out, "StartDir", b"\"C:\\\"");
        if let Some(icon) = &shortcut.icon {
            string(&mut out, "icon", icon.as_bytes());
        }
        for (name, value) in &shortcut.extra {
            string(&mut out, name, value);
        }
        for (name, value) in &shortcut.extra_ints {
            int(&mut out, name, *value);
        }
        int(&mut out, "IsHidden", 0);
        int(&mut out, "AllowOverlay", 1);
        int(&mut out, "LastPlayTime", 0x6503_0008);

        key(&mut out, MAP, "tags");
        for (i, tag) in shortcut.tags.iter().enumerate() {
            string(&mut out, &i.to_string(), tag.as_bytes());
        }
        out.push(MAP_END);

        out.push(MAP_END);
    }

    out.push(MAP_END);
    out.push(MAP_END);
    out
}
