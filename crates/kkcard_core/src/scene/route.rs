use serde::Serialize;

use super::common::{ChangeAmount, ObjectBase, read_list, write_list};
use super::object::{ObjectInfo, read_children, write_children};
use super::schema::{RoutePointSchema, SceneSchema};
use crate::error::Result;
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

/// Bezier helper handle of a route point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AidInfo {
    pub dic_key: i32,
    pub change_amount: ChangeAmount,
    pub is_init: bool,
}

impl Default for AidInfo {
    fn default() -> Self {
        Self {
            dic_key: -1,
            change_amount: ChangeAmount::default(),
            is_init: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePoint {
    pub dic_key: i32,
    pub change_amount: ChangeAmount,
    pub speed: f32,
    pub ease_type: i32,
    pub connection: i32,
    pub aid: AidInfo,
    pub link: bool,
}

impl RoutePoint {
    fn read(r: &mut ByteReader<'_>, schema: RoutePointSchema) -> Result<Self> {
        let dic_key = r.read_i32()?;
        let change_amount = ChangeAmount::read(r)?;
        let speed = r.read_f32()?;
        let ease_type = r.read_i32()?;
        let mut point = Self {
            dic_key,
            change_amount,
            speed,
            ease_type,
            connection: 0,
            aid: AidInfo::default(),
            link: false,
        };
        match schema {
            RoutePointSchema::Basic => {}
            RoutePointSchema::WithAid => point.read_aid(r)?,
            RoutePointSchema::Linked => {
                point.read_aid(r)?;
                point.link = r.read_bool()?;
            }
        }
        Ok(point)
    }

    fn read_aid(&mut self, r: &mut ByteReader<'_>) -> Result<()> {
        self.connection = r.read_i32()?;
        self.aid = AidInfo {
            dic_key: r.read_i32()?,
            change_amount: ChangeAmount::read(r)?,
            is_init: r.read_bool()?,
        };
        Ok(())
    }

    fn write(&self, w: &mut ByteWriter, schema: RoutePointSchema) {
        w.write_i32(self.dic_key);
        self.change_amount.write(w);
        w.write_f32(self.speed);
        w.write_i32(self.ease_type);
        match schema {
            RoutePointSchema::Basic => {}
            RoutePointSchema::WithAid => self.write_aid(w),
            RoutePointSchema::Linked => {
                self.write_aid(w);
                w.write_bool(self.link);
            }
        }
    }

    fn write_aid(&self, w: &mut ByteWriter) {
        w.write_i32(self.connection);
        w.write_i32(self.aid.dic_key);
        self.aid.change_amount.write(w);
        w.write_bool(self.aid.is_init);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInfo {
    pub base: ObjectBase,
    pub name: String,
    pub children: Vec<ObjectInfo>,
    pub points: Vec<RoutePoint>,
    pub active: bool,
    pub is_loop: bool,
    pub visible_line: bool,
    pub orient: i32,
    pub color: String,
}

impl RouteInfo {
    pub fn read(r: &mut ByteReader<'_>, base: ObjectBase, schema: &SceneSchema) -> Result<Self> {
        let name = r.read_var_string()?;
        let children = read_children(r, schema)?;
        let points = read_list(r, |r| RoutePoint::read(r, schema.route_point))?;
        let active = r.read_bool()?;
        let is_loop = r.read_bool()?;
        let visible_line = r.read_bool()?;
        let (orient, color) = if schema.route_extras {
            (r.read_i32()?, r.read_var_string()?)
        } else {
            (0, String::new())
        };
        Ok(Self {
            base,
            name,
            children,
            points,
            active,
            is_loop,
            visible_line,
            orient,
            color,
        })
    }

    pub fn write(&self, w: &mut ByteWriter, schema: &SceneSchema) -> Result<()> {
        w.write_var_string(&self.name);
        write_children(w, &self.children, schema)?;
        write_list(w, &self.points, |w, point| {
            point.write(w, schema.route_point);
            Ok(())
        })?;
        w.write_bool(self.active);
        w.write_bool(self.is_loop);
        w.write_bool(self.visible_line);
        if schema.route_extras {
            w.write_i32(self.orient);
            w.write_var_string(&self.color);
        }
        Ok(())
    }
}
